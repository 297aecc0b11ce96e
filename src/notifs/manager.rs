use std::sync::Arc;

use crate::app::Result;
use crate::domain::Message;
use crate::notifs::Notifier;
use crate::store::Store;

/// Owns notification state for unread messages: which ones are currently
/// shown, and how display/dismissal maps onto the underlying notifier.
pub struct MessagesNotificationManager {
    notifier: Arc<dyn Notifier + Send + Sync>,
    store: Arc<dyn Store + Send + Sync>,
}

impl MessagesNotificationManager {
    pub fn new(
        notifier: Arc<dyn Notifier + Send + Sync>,
        store: Arc<dyn Store + Send + Sync>,
    ) -> Self {
        Self { notifier, store }
    }

    /// Messages that have not yet been shown in a notification.
    pub fn filter_unseen(&self, unreads: &[Message]) -> Result<Vec<Message>> {
        let shown = self.store.shown_message_ids()?;
        Ok(unreads
            .iter()
            .filter(|m| !shown.contains(&m.id))
            .cloned()
            .collect())
    }

    /// Show notifications for the given messages and record them as shown.
    /// An empty slice is a no-op.
    pub fn display(&self, unseen: &[Message]) -> Result<()> {
        for message in unseen {
            self.notifier.display(message)?;
        }

        let ids: Vec<String> = unseen.iter().map(|m| m.id.clone()).collect();
        self.store.mark_shown(&ids)?;

        tracing::debug!("Displayed {} notifications", unseen.len());
        Ok(())
    }

    /// Remove notifications for exactly the given messages.
    pub fn dismiss(&self, stale: &[Message]) -> Result<()> {
        for message in stale {
            self.notifier.dismiss(&message.id)?;
        }

        let ids: Vec<String> = stale.iter().map(|m| m.id.clone()).collect();
        self.store.clear_shown(&ids)?;

        if !stale.is_empty() {
            tracing::debug!("Dismissed {} stale notifications", stale.len());
        }
        Ok(())
    }

    /// Remove every unread-message notification.
    pub fn dismiss_all(&self) -> Result<()> {
        self.notifier.dismiss_all()?;
        self.store.clear_all_shown()?;
        Ok(())
    }
}
