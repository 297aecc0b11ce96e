//! Configuration management for snoowatch.
//!
//! Configuration is read from `~/.config/snoowatch/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sync: SyncConfig,
    pub reddit: RedditConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Unread check interval, human format: "15m", "1h", "1d".
    pub interval: String,
    /// Run a sync right when the daemon starts.
    pub sync_on_start: bool,
    /// Delay before retrying after a network/server failure.
    pub retry_backoff: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval: "1h".to_string(),
            sync_on_start: true,
            retry_backoff: "5m".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedditConfig {
    pub base_url: String,
    /// OAuth bearer token. Unauthenticated requests work against the
    /// public JSON endpoints but not against message/unread.
    pub access_token: Option<String>,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com".to_string(),
            access_token: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub timeout_ms: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { timeout_ms: 5000 }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/snoowatch/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("snoowatch").join("config.toml"))
    }

    /// Sync interval as a [`Duration`].
    pub fn sync_interval(&self) -> Result<Duration, ConfigError> {
        Self::parse_interval(&self.sync.interval).map(Duration::from_secs)
    }

    /// Retry backoff as a [`Duration`].
    pub fn retry_backoff(&self) -> Result<Duration, ConfigError> {
        Self::parse_interval(&self.sync.retry_backoff).map(Duration::from_secs)
    }

    /// Parse interval string like "1h", "30m", "6h", "1d" into seconds.
    pub fn parse_interval(s: &str) -> Result<u64, ConfigError> {
        let s = s.trim().to_lowercase();

        let parsed = if let Some(hours) = s.strip_suffix('h') {
            hours.parse::<u64>().ok().map(|h| h * 3600)
        } else if let Some(minutes) = s.strip_suffix('m') {
            minutes.parse::<u64>().ok().map(|m| m * 60)
        } else if let Some(days) = s.strip_suffix('d') {
            days.parse::<u64>().ok().map(|d| d * 86400)
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.parse::<u64>().ok()
        } else {
            s.parse::<u64>().ok()
        };

        // Zero would make the daemon's periodic timer panic
        match parsed {
            Some(secs) if secs > 0 => Ok(secs),
            _ => Err(ConfigError::Interval(s)),
        }
    }

    /// Format an interval in seconds back to the human form.
    pub fn format_interval(secs: u64) -> String {
        if secs >= 86400 && secs.is_multiple_of(86400) {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs.is_multiple_of(3600) {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs.is_multiple_of(60) {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let default_config = Self::default_config_content();

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(default_config.as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# snoowatch configuration

[sync]
# How often to check for unread messages. A second, more aggressive
# 15-minute check runs automatically while on unmetered network and
# charging (unless this interval is already 15m).
# Format: "30m", "1h", "6h", "1d", or raw seconds.
interval = "1h"

# Run a sync immediately when the daemon starts
sync_on_start = true

# How long to wait before retrying after a network or server error
retry_backoff = "5m"

[reddit]
base_url = "https://www.reddit.com"

# OAuth bearer token; required for the unread inbox.
# access_token = "..."

[notifications]
# Desktop notification timeout in milliseconds
timeout_ms = 5000
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid interval: {0}. Use format like '1h', '30m', '1d'")]
    Interval(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.sync.interval, "1h");
        assert!(config.sync.sync_on_start);
        assert_eq!(config.notifications.timeout_ms, 5000);
        assert!(config.reddit.access_token.is_none());
    }

    #[test]
    fn test_partial_config() {
        let content = r#"
[sync]
interval = "15m"
"#;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.sync.interval, "15m");
        // Default values fill the rest
        assert_eq!(config.sync.retry_backoff, "5m");
        assert_eq!(config.reddit.base_url, "https://www.reddit.com");
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.sync.interval, "1h");
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(Config::parse_interval("1h").unwrap(), 3600);
        assert_eq!(Config::parse_interval("30m").unwrap(), 1800);
        assert_eq!(Config::parse_interval("1d").unwrap(), 86400);
        assert_eq!(Config::parse_interval("60s").unwrap(), 60);
        assert_eq!(Config::parse_interval("3600").unwrap(), 3600);
        assert!(Config::parse_interval("invalid").is_err());
    }

    #[test]
    fn test_parse_interval_rejects_zero() {
        assert!(Config::parse_interval("0").is_err());
        assert!(Config::parse_interval("0s").is_err());
        assert!(Config::parse_interval("0m").is_err());
        assert!(Config::parse_interval("0h").is_err());
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(Config::format_interval(3600), "1h");
        assert_eq!(Config::format_interval(1800), "30m");
        assert_eq!(Config::format_interval(86400), "1d");
        assert_eq!(Config::format_interval(90), "90s");
        assert_eq!(Config::format_interval(900), "15m");
    }

    #[test]
    fn test_sync_interval_duration() {
        let config = Config::default();
        assert_eq!(config.sync_interval().unwrap(), Duration::from_secs(3600));
        assert_eq!(config.retry_backoff().unwrap(), Duration::from_secs(300));
    }
}
