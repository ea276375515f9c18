//! Credentials and the cached bearer token

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TokenPolicy;

/// Client id / secret pair exchanged for a bearer token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), client_secret: client_secret.into() }
    }

    pub fn is_complete(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Bearer token as persisted alongside the credentials.
///
/// Replaced wholesale on refresh; never mutated in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Stamp a freshly exchanged token with its issue and expiry times.
    ///
    /// An expiry past the representable range is pinned to the latest date.
    pub fn issue(token: impl Into<String>, issued_at: DateTime<Utc>, policy: &TokenPolicy) -> Self {
        let expires_at = issued_at
            .checked_add_signed(policy.validity_window())
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { token: token.into(), issued_at, expires_at }
    }

    /// A token is usable while `now - issued_at < window - buffer`.
    pub fn is_valid_at(&self, policy: &TokenPolicy, now: DateTime<Utc>) -> bool {
        now - self.issued_at < policy.usable_lifetime()
    }
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
