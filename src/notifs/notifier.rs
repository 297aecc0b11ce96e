use std::collections::HashMap;
use std::sync::Mutex;

use crate::app::{Result, SnooError};
use crate::domain::Message;

/// Where notifications actually go. The desktop implementation talks to
/// the freedesktop notification service; tests substitute a recorder.
pub trait Notifier {
    fn display(&self, message: &Message) -> Result<()>;
    fn dismiss(&self, message_id: &str) -> Result<()>;
    fn dismiss_all(&self) -> Result<()>;
}

/// notify-rust backed notifier. Keeps the handle of every live
/// notification so individual ones can be closed later.
pub struct DesktopNotifier {
    timeout_ms: u32,
    handles: Mutex<HashMap<String, notify_rust::NotificationHandle>>,
}

impl DesktopNotifier {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            handles: Mutex::new(HashMap::new()),
        }
    }

    fn lock_handles(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, notify_rust::NotificationHandle>>> {
        self.handles
            .lock()
            .map_err(|e| SnooError::Other(format!("Notifier state poisoned: {e}")))
    }
}

impl Notifier for DesktopNotifier {
    fn display(&self, message: &Message) -> Result<()> {
        let handle = notify_rust::Notification::new()
            .summary(&format!("From: {}", message.display_author()))
            .body(&message.subject)
            .icon("mail-message-new")
            .timeout(notify_rust::Timeout::Milliseconds(self.timeout_ms))
            .show()
            .map_err(|e| SnooError::Other(format!("Failed to show notification: {e}")))?;

        self.lock_handles()?.insert(message.id.clone(), handle);
        Ok(())
    }

    fn dismiss(&self, message_id: &str) -> Result<()> {
        if let Some(handle) = self.lock_handles()?.remove(message_id) {
            handle.close();
        }
        Ok(())
    }

    fn dismiss_all(&self) -> Result<()> {
        let handles = std::mem::take(&mut *self.lock_handles()?);
        for (_, handle) in handles {
            handle.close();
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum NotifierCall {
        Display(String),
        Dismiss(String),
        DismissAll,
    }

    /// Records every call so tests can assert on the exact sequence.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub calls: Mutex<Vec<NotifierCall>>,
    }

    impl RecordingNotifier {
        pub fn calls(&self) -> Vec<NotifierCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn displayed_ids(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    NotifierCall::Display(id) => Some(id),
                    _ => None,
                })
                .collect()
        }

        pub fn dismissed_ids(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    NotifierCall::Dismiss(id) => Some(id),
                    _ => None,
                })
                .collect()
        }

        pub fn dismissed_all(&self) -> bool {
            self.calls().contains(&NotifierCall::DismissAll)
        }
    }

    impl Notifier for RecordingNotifier {
        fn display(&self, message: &Message) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(NotifierCall::Display(message.id.clone()));
            Ok(())
        }

        fn dismiss(&self, message_id: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(NotifierCall::Dismiss(message_id.to_string()));
            Ok(())
        }

        fn dismiss_all(&self) -> Result<()> {
            self.calls.lock().unwrap().push(NotifierCall::DismissAll);
            Ok(())
        }
    }
}
