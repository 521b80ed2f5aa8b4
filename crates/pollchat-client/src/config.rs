//! Client configuration.
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! server_url = "http://chat.example.net:8080/"
//! username = "alice"
//! poll_timeout_ms = 120000
//! backoff_ms = 5000
//! ```

use crate::error::ConfigError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Client settings. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL; the `cmd` and `poll` endpoints are resolved against it.
    pub server_url: String,
    /// Display name requested at login.
    pub username: Option<String>,
    /// Client-side limit for one poll. Must exceed the server's hold time.
    pub poll_timeout_ms: u64,
    /// Delay before re-polling after an error.
    pub backoff_ms: u64,
    /// Client-side limit for one command.
    pub command_timeout_ms: u64,
    /// Ignore repeated joins of the same public id.
    pub dedup_roster: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080/".to_string(),
            username: None,
            poll_timeout_ms: 120_000,
            backoff_ms: 5_000,
            command_timeout_ms: 30_000,
            dedup_roster: false,
        }
    }
}

impl ClientConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check the server URL and that both timeouts are non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_timeout_ms == 0 {
            return Err(ConfigError::Invalid("poll_timeout_ms must be non-zero".into()));
        }
        if self.command_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "command_timeout_ms must be non-zero".into(),
            ));
        }
        self.base_url().map(|_| ())
    }

    /// Server URL with a trailing slash, so endpoint joins append.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.server_url)
            .map_err(|e| ConfigError::Invalid(format!("server_url {:?}: {e}", self.server_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "server_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Client-side limit for one poll.
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    /// Delay after a failed poll.
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    /// Client-side limit for one command.
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.poll_timeout(), Duration::from_secs(120));
        assert_eq!(config.backoff(), Duration::from_millis(5000));
    }

    #[test]
    fn partial_file_overrides() {
        let config = ClientConfig::from_toml_str(
            r#"
            server_url = "http://chat.local:9000/app"
            username = "alice"
            backoff_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.username.as_deref(), Some("alice"));
        assert_eq!(config.backoff(), Duration::from_millis(250));
        assert_eq!(config.base_url().unwrap().as_str(), "http://chat.local:9000/app/");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ClientConfig::from_toml_str("poll_timeout_ms = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ClientConfig::from_toml_str(r#"server_url = "ftp://x/""#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ClientConfig::from_toml_str("backoff_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
