use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{Result, SnooError};
use crate::config::Config;
use crate::inbox::{HttpInboxClient, InboxClient};
use crate::notifs::{CheckUnreadMessagesJob, DesktopNotifier, MessagesNotificationManager, Notifier};
use crate::store::sqlite::SqliteStore;

pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub inbox: Arc<dyn InboxClient + Send + Sync>,
    pub sync_job: Arc<CheckUnreadMessagesJob>,
}

impl AppContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        let inbox: Arc<dyn InboxClient + Send + Sync> = Arc::new(HttpInboxClient::new(
            Some(&config.reddit.base_url),
            config.reddit.access_token.as_deref(),
        )?);
        let notifier: Arc<dyn Notifier + Send + Sync> =
            Arc::new(DesktopNotifier::new(config.notifications.timeout_ms));

        Ok(Self::assemble(config, store, inbox, notifier))
    }

    /// Wire a context from pre-built parts. Used by tests to substitute
    /// fakes for the network and notification edges.
    pub fn assemble(
        config: Config,
        store: Arc<SqliteStore>,
        inbox: Arc<dyn InboxClient + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
    ) -> Self {
        let manager = MessagesNotificationManager::new(notifier, store.clone());
        let sync_job = Arc::new(CheckUnreadMessagesJob::new(
            inbox.clone(),
            store.clone(),
            manager,
        ));

        Self {
            config,
            store,
            inbox,
            sync_job,
        }
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| SnooError::Config("Could not find data directory".into()))?;
        let snoowatch_dir = data_dir.join("snoowatch");
        std::fs::create_dir_all(&snoowatch_dir)?;
        Ok(snoowatch_dir.join("snoowatch.db"))
    }
}
