use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use snoowatch::app::AppContext;
use snoowatch::cli::{commands, Cli, Commands, DaemonAction, InboxAction};
use snoowatch::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // `daemon stop` and `status` only touch the PID file
    match &cli.command {
        Commands::Daemon {
            action: DaemonAction::Stop,
        } => {
            commands::stop_daemon()?;
            return Ok(());
        }
        Commands::Daemon {
            action: DaemonAction::Status,
        } => {
            commands::daemon_status()?;
            return Ok(());
        }
        _ => {}
    }

    let config = Config::load()?;
    let ctx = AppContext::new(config, None)?;

    match cli.command {
        Commands::Sync { cached } => {
            commands::sync_now(&ctx, cached).await?;
        }
        Commands::Daemon {
            action: DaemonAction::Start { interval, log_file },
        } => {
            commands::start_daemon(Arc::new(ctx), interval, log_file).await?;
        }
        Commands::Daemon { .. } => unreachable!("handled above"),
        Commands::Inbox {
            action: InboxAction::List,
        } => {
            commands::list_inbox(&ctx)?;
        }
        Commands::Inbox {
            action: InboxAction::Active { state },
        } => {
            commands::set_inbox_active(&ctx, state == "on")?;
        }
        Commands::Feed {
            subreddit,
            limit,
            pages,
        } => {
            commands::show_feed(&ctx, &subreddit, limit, pages).await?;
        }
    }

    Ok(())
}
