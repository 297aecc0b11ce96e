use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::app::{Result, SnooError};
use crate::domain::{Message, SubmissionUiModel};
use crate::inbox::{InboxClient, Listing};

const DEFAULT_BASE_URL: &str = "https://www.reddit.com";

pub struct HttpInboxClient {
    client: Client,
    base_url: Url,
}

impl HttpInboxClient {
    pub fn new(base_url: Option<&str>, access_token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = access_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .user_agent("snoowatch/0.1.0")
            .default_headers(headers)
            .build()?;

        let base_url = Url::parse(base_url.unwrap_or(DEFAULT_BASE_URL))?;

        Ok(Self { client, base_url })
    }

    async fn get_listing(&self, url: Url) -> Result<ApiListing> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SnooError::Api {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<ApiListing>().await?)
    }
}

#[async_trait]
impl InboxClient for HttpInboxClient {
    async fn fetch_unread(&self) -> Result<Vec<Message>> {
        // GET message/unread does not mark anything read; that requires
        // an explicit POST api/read_message, which this client never sends.
        let url = self.base_url.join("message/unread.json")?;
        let listing = self.get_listing(url).await?;

        let fetched_at = Utc::now();
        let messages = listing
            .data
            .children
            .into_iter()
            .map(|child| child.data.into_message(fetched_at))
            .collect();

        Ok(messages)
    }

    async fn fetch_subreddit(
        &self,
        subreddit: &str,
        after: Option<&str>,
        limit: u32,
    ) -> Result<Listing> {
        let mut url = self.base_url.join(&format!("r/{subreddit}.json"))?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        if let Some(after) = after {
            url.query_pairs_mut().append_pair("after", after);
        }

        let listing = self.get_listing(url).await?;

        let submissions = listing
            .data
            .children
            .into_iter()
            .map(|child| child.data.into_submission())
            .collect();

        Ok(Listing {
            submissions,
            after: listing.data.after,
        })
    }
}

// Reddit's listing envelope: { "data": { "after": ..., "children": [...] } }

#[derive(Debug, Deserialize)]
struct ApiListing {
    data: ApiListingData,
}

#[derive(Debug, Deserialize)]
struct ApiListingData {
    #[serde(default)]
    after: Option<String>,
    #[serde(default)]
    children: Vec<ApiThing>,
}

#[derive(Debug, Deserialize)]
struct ApiThing {
    data: ApiThingData,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApiThingData {
    #[serde(default)]
    name: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    created_utc: Option<f64>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subreddit: Option<String>,
    #[serde(default)]
    score: Option<i64>,
    #[serde(default)]
    num_comments: Option<u64>,
}

impl ApiThingData {
    fn into_message(self, fetched_at: DateTime<Utc>) -> Message {
        Message {
            id: self.name,
            author: self.author,
            subject: self.subject.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
            created_at: self
                .created_utc
                .and_then(|secs| DateTime::from_timestamp(secs as i64, 0)),
            fetched_at,
        }
    }

    fn into_submission(self) -> SubmissionUiModel {
        SubmissionUiModel {
            adapter_id: SubmissionUiModel::adapter_id_for(&self.name),
            fullname: self.name,
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            subreddit: self.subreddit.unwrap_or_default(),
            score: self.score.unwrap_or(0),
            num_comments: self.num_comments.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unread_listing_deserializes() {
        let json = r#"{
            "kind": "Listing",
            "data": {
                "after": null,
                "children": [
                    {
                        "kind": "t4",
                        "data": {
                            "name": "t4_abc",
                            "author": "someone",
                            "subject": "hello",
                            "body": "hi there",
                            "created_utc": 1700000000.0
                        }
                    }
                ]
            }
        }"#;

        let listing: ApiListing = serde_json::from_str(json).unwrap();
        let message = listing.data.children[0].data.clone().into_message(Utc::now());
        assert_eq!(message.id, "t4_abc");
        assert_eq!(message.subject, "hello");
        assert_eq!(message.display_author(), "someone");
        assert!(message.created_at.is_some());
    }

    #[test]
    fn test_submission_listing_deserializes() {
        let json = r#"{
            "kind": "Listing",
            "data": {
                "after": "t3_next",
                "children": [
                    {
                        "kind": "t3",
                        "data": {
                            "name": "t3_xyz",
                            "author": "poster",
                            "title": "A post",
                            "subreddit": "rust",
                            "score": 42,
                            "num_comments": 7
                        }
                    }
                ]
            }
        }"#;

        let listing: ApiListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.data.after.as_deref(), Some("t3_next"));

        let submission = listing
            .data
            .children
            .into_iter()
            .next()
            .unwrap()
            .data
            .into_submission();
        assert_eq!(submission.fullname, "t3_xyz");
        assert_eq!(submission.score, 42);
        assert_eq!(
            submission.adapter_id,
            SubmissionUiModel::adapter_id_for("t3_xyz")
        );
    }
}
