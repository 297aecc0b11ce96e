use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnooError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Reddit API error: HTTP {status}")]
    Api { status: u16 },

    #[error("Response parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl SnooError {
    /// Transport-level failure: connect, timeout, DNS. Worth retrying on
    /// the next cycle.
    pub fn is_network_error(&self) -> bool {
        match self {
            SnooError::Http(e) => {
                e.is_timeout() || e.is_connect() || (e.is_request() && e.status().is_none())
            }
            _ => false,
        }
    }

    /// Reddit returned a 5xx. Also retryable.
    pub fn is_server_error(&self) -> bool {
        match self {
            SnooError::Api { status } => (500..=599).contains(status),
            SnooError::Http(e) => e.status().is_some_and(|s| s.is_server_error()),
            _ => false,
        }
    }

    /// Anything that is neither a network nor a server failure. Logged,
    /// never retried.
    pub fn is_unknown(&self) -> bool {
        !self.is_network_error() && !self.is_server_error()
    }
}

pub type Result<T> = std::result::Result<T, SnooError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_5xx_is_server_error() {
        let err = SnooError::Api { status: 503 };
        assert!(err.is_server_error());
        assert!(!err.is_network_error());
        assert!(!err.is_unknown());
    }

    #[test]
    fn test_api_4xx_is_unknown() {
        let err = SnooError::Api { status: 403 };
        assert!(!err.is_server_error());
        assert!(!err.is_network_error());
        assert!(err.is_unknown());
    }

    #[test]
    fn test_config_error_is_unknown() {
        let err = SnooError::Config("missing token".into());
        assert!(err.is_unknown());
    }

    #[test]
    fn test_database_error_is_unknown() {
        let err = SnooError::Database(rusqlite::Error::InvalidQuery);
        assert!(err.is_unknown());
    }
}
