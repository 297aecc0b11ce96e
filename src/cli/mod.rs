pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "snoowatch")]
#[command(about = "Reddit unread-inbox watcher with desktop notifications")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one sync cycle right now
    Sync {
        /// Re-derive notifications from the cached unread set, skipping
        /// the network fetch
        #[arg(long)]
        cached: bool,
    },
    /// Background sync daemon
    Daemon {
        #[command(subcommand)]
        action: DaemonAction,
    },
    /// Unread inbox
    Inbox {
        #[command(subcommand)]
        action: InboxAction,
    },
    /// Render a subreddit feed
    Feed {
        /// Subreddit name, without the r/ prefix
        subreddit: String,
        /// Submissions per page
        #[arg(long, default_value_t = 25)]
        limit: u32,
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
}

#[derive(Subcommand)]
pub enum DaemonAction {
    /// Start the daemon in the foreground
    Start {
        /// Override the configured sync interval (e.g. "30m", "1h")
        #[arg(long)]
        interval: Option<String>,
        /// Write daemon log lines to this file instead of stdout
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Stop a running daemon
    Stop,
    /// Show daemon status
    Status,
}

#[derive(Subcommand)]
pub enum InboxAction {
    /// List cached unread messages
    List,
    /// Mark the unread view active or inactive. While active, the sync
    /// job raises no notifications.
    Active {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },
}
