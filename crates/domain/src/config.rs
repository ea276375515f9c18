//! Configuration structures
//!
//! The persisted configuration doubles as the session store: the cached
//! token lives next to the credentials it was issued for and is replaced
//! wholesale whenever a refresh happens.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL_MS, DEFAULT_POLL_MAX_ATTEMPTS,
    DEFAULT_TOKEN_REFRESH_BUFFER_MINUTES, DEFAULT_TOKEN_VALIDITY_MINUTES,
    MAX_TOKEN_VALIDITY_MINUTES,
};
use crate::errors::{CaseSyncError, Result};
use crate::types::{CachedToken, Credentials};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub remote: RemoteConfig,
    #[serde(default)]
    pub token: TokenPolicy,
    #[serde(default)]
    pub polling: PollPolicy,
}

impl Config {
    /// Reject configurations the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.remote.base_url.trim().is_empty() {
            return Err(CaseSyncError::Config("base URL must not be empty".into()));
        }
        if self.remote.client_id.trim().is_empty() || self.remote.client_secret.trim().is_empty() {
            return Err(CaseSyncError::Config("client id and client secret are required".into()));
        }
        self.token.validate()?;
        self.polling.validate()
    }
}

/// Remote service endpoint, credentials and the persisted session token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_token: Option<CachedToken>,
}

impl RemoteConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.client_id.clone(), self.client_secret.clone())
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_id: String::new(),
            client_secret: String::new(),
            cached_token: None,
        }
    }
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("cached_token", &self.cached_token)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// How long an issued token may be used before it is proactively replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPolicy {
    pub validity_window_minutes: i64,
    pub refresh_buffer_minutes: i64,
}

impl TokenPolicy {
    /// Portion of the validity window during which a cached token is served.
    pub fn usable_lifetime(&self) -> TimeDelta {
        saturating_minutes(self.validity_window_minutes.saturating_sub(self.refresh_buffer_minutes))
    }

    pub fn validity_window(&self) -> TimeDelta {
        saturating_minutes(self.validity_window_minutes)
    }

    fn validate(&self) -> Result<()> {
        if self.validity_window_minutes > MAX_TOKEN_VALIDITY_MINUTES {
            return Err(CaseSyncError::Config(format!(
                "token validity window ({} min) exceeds the maximum of {MAX_TOKEN_VALIDITY_MINUTES} min",
                self.validity_window_minutes
            )));
        }
        if self.refresh_buffer_minutes < 0
            || self.refresh_buffer_minutes >= self.validity_window_minutes
        {
            return Err(CaseSyncError::Config(format!(
                "refresh buffer ({} min) must be shorter than the validity window ({} min)",
                self.refresh_buffer_minutes, self.validity_window_minutes
            )));
        }
        Ok(())
    }
}

/// Clamp to chrono's range instead of panicking on out-of-range minutes.
fn saturating_minutes(minutes: i64) -> TimeDelta {
    TimeDelta::try_minutes(minutes)
        .unwrap_or(if minutes < 0 { TimeDelta::MIN } else { TimeDelta::MAX })
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            validity_window_minutes: DEFAULT_TOKEN_VALIDITY_MINUTES,
            refresh_buffer_minutes: DEFAULT_TOKEN_REFRESH_BUFFER_MINUTES,
        }
    }
}

/// Bounds for import job polling (`max_attempts × interval_ms` at most).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

impl PollPolicy {
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.interval_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(CaseSyncError::Config("polling max attempts must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_POLL_MAX_ATTEMPTS, interval_ms: DEFAULT_POLL_INTERVAL_MS }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            remote: RemoteConfig {
                client_id: "id".into(),
                client_secret: "secret".into(),
                ..RemoteConfig::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn defaults_match_remote_token_lifetime() {
        let policy = TokenPolicy::default();
        assert_eq!(policy.validity_window(), TimeDelta::hours(24));
        assert_eq!(policy.usable_lifetime(), TimeDelta::minutes(23 * 60 + 30));
        assert_eq!(PollPolicy::default().max_attempts, 30);
        assert_eq!(PollPolicy::default().interval_ms, 2000);
    }

    #[test]
    fn rejects_missing_credentials() {
        let mut config = valid_config();
        config.remote.client_secret = "  ".into();
        assert!(matches!(config.validate(), Err(CaseSyncError::Config(_))));
    }

    #[test]
    fn rejects_buffer_longer_than_window() {
        let mut config = valid_config();
        config.token.refresh_buffer_minutes = config.token.validity_window_minutes;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_window_beyond_a_year() {
        let mut config = valid_config();
        config.token.validity_window_minutes = 1_000_000_000_000;
        assert!(matches!(config.validate(), Err(CaseSyncError::Config(msg)) if msg.contains("maximum")));

        config.token.validity_window_minutes = MAX_TOKEN_VALIDITY_MINUTES;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_windows_saturate() {
        let policy = TokenPolicy { validity_window_minutes: i64::MAX / 2, refresh_buffer_minutes: -5 };
        assert_eq!(policy.validity_window(), TimeDelta::MAX);
        assert_eq!(policy.usable_lifetime(), TimeDelta::MAX);

        let negative = TokenPolicy { validity_window_minutes: i64::MIN, refresh_buffer_minutes: 0 };
        assert_eq!(negative.validity_window(), TimeDelta::MIN);
    }

    #[test]
    fn rejects_zero_poll_attempts() {
        let mut config = valid_config();
        config.polling.max_attempts = 0;
        assert!(config.validate().is_err());
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", valid_config().remote);
        assert!(!rendered.contains("secret\""));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn deserializes_minimal_json_with_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"remote":{"clientId":"a","clientSecret":"b"}}"#).unwrap();
        assert_eq!(config.remote.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.token, TokenPolicy::default());
        assert!(config.remote.cached_token.is_none());
    }
}
