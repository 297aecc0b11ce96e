pub mod http_client;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Message, SubmissionUiModel};

pub use http_client::HttpInboxClient;

/// A page of subreddit submissions plus the cursor for the next page.
#[derive(Debug, Clone)]
pub struct Listing {
    pub submissions: Vec<SubmissionUiModel>,
    pub after: Option<String>,
}

#[async_trait]
pub trait InboxClient {
    /// Fetch the current unread inbox. Non-destructive: messages are not
    /// marked read on the server.
    async fn fetch_unread(&self) -> Result<Vec<Message>>;

    /// Fetch a page of submissions from a subreddit.
    async fn fetch_subreddit(
        &self,
        subreddit: &str,
        after: Option<&str>,
        limit: u32,
    ) -> Result<Listing>;
}
