use std::sync::Arc;

use tokio::sync::Mutex;

use crate::app::Result;
use crate::domain::stale_messages;
use crate::inbox::InboxClient;
use crate::notifs::MessagesNotificationManager;
use crate::store::{Store, PREF_UNREAD_FOLDER_ACTIVE};

/// Result of one sync invocation. Reported exactly once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// The cycle ran to completion (successfully or not).
    /// `needs_reschedule` asks the caller to retry soon.
    Completed { needs_reschedule: bool },
    /// Another invocation was already in flight; nothing was done.
    Skipped,
}

impl JobOutcome {
    pub fn needs_reschedule(&self) -> bool {
        matches!(
            self,
            JobOutcome::Completed {
                needs_reschedule: true
            }
        )
    }
}

/// Fetches unread messages, dismisses notifications that went stale, and
/// raises notifications for messages not shown yet.
///
/// Invocations are single-flight: a trigger that arrives while a cycle is
/// in flight is dropped, not queued.
pub struct CheckUnreadMessagesJob {
    inbox: Arc<dyn InboxClient + Send + Sync>,
    store: Arc<dyn Store + Send + Sync>,
    manager: MessagesNotificationManager,
    in_flight: Mutex<()>,
}

impl CheckUnreadMessagesJob {
    pub fn new(
        inbox: Arc<dyn InboxClient + Send + Sync>,
        store: Arc<dyn Store + Send + Sync>,
        manager: MessagesNotificationManager,
    ) -> Self {
        Self {
            inbox,
            store,
            manager,
            in_flight: Mutex::new(()),
        }
    }

    /// Run one sync cycle.
    ///
    /// With `refresh` set, the unread set is re-fetched from the network
    /// and notifications for messages that disappeared from it are
    /// dismissed first. Without it, notifications are re-derived from the
    /// cached set only.
    pub async fn run(&self, refresh: bool) -> JobOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!("Unread sync already in flight, skipping");
            return JobOutcome::Skipped;
        };

        match self.run_cycle(refresh).await {
            Ok(()) => JobOutcome::Completed {
                needs_reschedule: false,
            },
            Err(e) => {
                let needs_reschedule = e.is_network_error() || e.is_server_error();
                if e.is_unknown() {
                    tracing::error!("Unknown error while checking unread messages: {e}");
                } else {
                    tracing::warn!("Unread sync failed, will retry: {e}");
                }
                JobOutcome::Completed { needs_reschedule }
            }
        }
    }

    async fn run_cycle(&self, refresh: bool) -> Result<()> {
        if refresh {
            let existing = self.store.unread_messages()?;
            let received = self.inbox.fetch_unread().await?;
            self.store.replace_unread(&received)?;

            // The notification service keeps amending the existing bundle
            // when new notifications are posted, so messages that left the
            // unread set have to be cleaned up by hand.
            let stale = stale_messages(&existing, &received);
            self.manager.dismiss(&stale)?;
        }

        let unreads = self.store.unread_messages()?;
        if unreads.is_empty() {
            self.manager.dismiss_all()?;
        } else if !self.store.get_flag(PREF_UNREAD_FOLDER_ACTIVE)? {
            let unseen = self.manager.filter_unseen(&unreads)?;
            self.manager.display(&unseen)?;
        }

        Ok(())
    }
}
