use std::path::PathBuf;
use std::sync::Arc;

use crate::app::{AppContext, Result, SnooError};
use crate::config::Config;
use crate::daemon::{self, Daemon, DaemonConfig};
use crate::domain::{FeedRow, PaginationState, PaginationUiModel};
use crate::feed::{calculate_diff, FeedListAdapter, VecSurface};
use crate::notifs::JobOutcome;
use crate::sched::SysfsProbe;
use crate::store::{Store, PREF_UNREAD_FOLDER_ACTIVE};

pub async fn sync_now(ctx: &AppContext, cached: bool) -> Result<()> {
    let outcome = ctx.sync_job.run(!cached).await;

    match outcome {
        JobOutcome::Completed {
            needs_reschedule: false,
        } => {
            let count = ctx.store.unread_messages()?.len();
            println!("Sync complete: {} unread", count);
        }
        JobOutcome::Completed {
            needs_reschedule: true,
        } => {
            println!("Sync failed; a running daemon would retry shortly");
        }
        JobOutcome::Skipped => {
            println!("A sync is already in flight");
        }
    }

    Ok(())
}

pub async fn start_daemon(
    ctx: Arc<AppContext>,
    interval: Option<String>,
    log_file: Option<PathBuf>,
) -> Result<()> {
    let mut config = ctx.config.clone();
    if let Some(interval) = interval {
        // Validate before handing it to the daemon
        Config::parse_interval(&interval).map_err(|e| SnooError::Config(e.to_string()))?;
        config.sync.interval = interval;
    }

    let daemon_config = DaemonConfig::from_config(&config, log_file)?;
    let daemon = Daemon::new(ctx, daemon_config, Arc::new(SysfsProbe));
    daemon.run().await
}

pub fn stop_daemon() -> Result<()> {
    match daemon::stop_daemon() {
        Ok(()) => {
            println!("Daemon stopped");
            Ok(())
        }
        Err(e) => Err(SnooError::Other(e)),
    }
}

pub fn daemon_status() -> Result<()> {
    println!("{}", daemon::daemon_status());
    Ok(())
}

pub fn list_inbox(ctx: &AppContext) -> Result<()> {
    let unread = ctx.store.unread_messages()?;

    if unread.is_empty() {
        println!("No unread messages");
        return Ok(());
    }

    for message in &unread {
        let when = message
            .created_at
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown time".to_string());
        println!(
            "{}  u/{}  {}  [{}]",
            when,
            message.display_author(),
            message.subject,
            message.id
        );
    }
    println!("{} unread", unread.len());

    Ok(())
}

pub fn set_inbox_active(ctx: &AppContext, on: bool) -> Result<()> {
    ctx.store.set_flag(PREF_UNREAD_FOLDER_ACTIVE, on)?;
    println!(
        "Unread view marked {}",
        if on { "active" } else { "inactive" }
    );
    Ok(())
}

/// Fetch and render a subreddit feed through the diff-driven list adapter,
/// one page at a time.
pub async fn show_feed(ctx: &AppContext, subreddit: &str, limit: u32, pages: u32) -> Result<()> {
    let mut adapter = FeedListAdapter::new();
    let mut surface = VecSurface::default();

    let mut submissions: Vec<FeedRow> = Vec::new();
    let mut after: Option<String> = None;

    for page in 0..pages.max(1) {
        // Show the footer in its loading state while the page is in flight
        let mut loading = submissions.clone();
        loading.push(FeedRow::PaginationFooter(PaginationUiModel {
            state: PaginationState::Loading,
        }));
        let diff = calculate_diff(adapter.rows(), &loading);
        adapter.apply((loading, diff), &mut surface);

        let listing = match ctx.inbox.fetch_subreddit(subreddit, after.as_deref(), limit).await {
            Ok(listing) => listing,
            Err(e) => {
                let mut failed = submissions.clone();
                failed.push(FeedRow::PaginationFooter(PaginationUiModel {
                    state: PaginationState::Failed,
                }));
                let diff = calculate_diff(adapter.rows(), &failed);
                adapter.apply((failed, diff), &mut surface);
                print_surface(&surface);
                return Err(e);
            }
        };

        submissions.extend(listing.submissions.into_iter().map(FeedRow::Submission));
        after = listing.after;

        if after.is_none() {
            tracing::debug!("r/{} exhausted after page {}", subreddit, page + 1);
            break;
        }
    }

    // Final state: keep an idle footer only if there is more to load
    let mut rows = submissions;
    if after.is_some() {
        rows.push(FeedRow::PaginationFooter(PaginationUiModel {
            state: PaginationState::Idle,
        }));
    }
    let diff = calculate_diff(adapter.rows(), &rows);
    adapter.apply((rows, diff), &mut surface);

    print_surface(&surface);
    println!("{} submissions", adapter.item_count_minus_decorators());

    Ok(())
}

fn print_surface(surface: &VecSurface) {
    for text in surface.texts() {
        println!("{}", text);
    }
}
