//! # snoowatch
//!
//! A Reddit unread-inbox watcher for the desktop.
//!
//! ## Architecture
//!
//! ```text
//! InboxClient → Store → CheckUnreadMessagesJob → Notifier
//!                  ↘ FeedListAdapter → RenderSurface
//! ```
//!
//! Two loosely-related flows share the crate:
//!
//! - **Unread sync**: a recurring background job fetches the unread inbox,
//!   dismisses notifications for messages that left it, and raises
//!   notifications for messages not shown yet.
//! - **Feed rendering**: subreddit submission lists are rendered through
//!   per-row-type child adapters, updated by replaying computed list diffs.
//!
//! ## Quick Start
//!
//! ```bash
//! # One-off sync
//! snoowatch sync
//!
//! # Background daemon (15m aggressive checks while charging/unmetered)
//! snoowatch daemon start
//!
//! # Show cached unread messages
//! snoowatch inbox list
//!
//! # Render a subreddit feed
//! snoowatch feed rust --limit 25 --pages 2
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires together store, inbox client,
/// and the sync job.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/snoowatch/config.toml`: sync intervals, Reddit
/// API settings, notification settings.
pub mod config;

/// Background daemon interpreting the sync schedule.
pub mod daemon;

/// Core domain models.
///
/// - [`Message`](domain::Message): unread inbox message, identity-equal
/// - [`stale_messages`](domain::stale_messages): snapshot set difference
/// - [`FeedRow`](domain::FeedRow): tagged feed row variants
pub mod domain;

/// Diff-driven feed list rendering.
///
/// - [`calculate_diff`](feed::calculate_diff): keyed list diff
/// - [`FeedListAdapter`](feed::FeedListAdapter): per-type dispatch
pub mod feed;

/// Reddit API client.
///
/// [`InboxClient`](inbox::InboxClient): async trait over the unread inbox
/// and subreddit listings; [`HttpInboxClient`](inbox::HttpInboxClient) is
/// the reqwest implementation.
pub mod inbox;

/// Notification layer.
///
/// - [`Notifier`](notifs::Notifier): display/dismiss seam
/// - [`MessagesNotificationManager`](notifs::MessagesNotificationManager):
///   shown-state bookkeeping
/// - [`CheckUnreadMessagesJob`](notifs::CheckUnreadMessagesJob): the sync
///   cycle itself
pub mod notifs;

/// Sync job parameterization: periodic triggers, constraints, immediate
/// one-offs.
pub mod sched;

/// SQLite persistence layer.
pub mod store;
