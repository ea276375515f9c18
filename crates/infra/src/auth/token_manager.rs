//! Credential-to-token exchange and cached token validity
//!
//! The manager holds no token state. Callers hand in the cached token they
//! have (if any) and get back either that token or a freshly issued one,
//! which they are responsible for persisting.

use std::time::Duration;

use casesync_domain::{CachedToken, CaseSyncError, Credentials, Result, TokenPolicy};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use crate::errors::classify_auth_failure;
use crate::http::HttpClient;
use crate::integrations::testmgmt::RemoteEndpoints;

const AUTH_TIMEOUT_SECS: u64 = 20;

/// Result of [`AuthTokenManager::get_token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenGrant {
    /// The supplied cached token is still inside its usable lifetime.
    Cached(CachedToken),
    /// A new token was exchanged and must be persisted by the caller.
    Refreshed(CachedToken),
}

impl TokenGrant {
    pub fn token(&self) -> &CachedToken {
        match self {
            Self::Cached(token) | Self::Refreshed(token) => token,
        }
    }

    pub fn into_token(self) -> CachedToken {
        match self {
            Self::Cached(token) | Self::Refreshed(token) => token,
        }
    }

    pub fn is_refreshed(&self) -> bool {
        matches!(self, Self::Refreshed(_))
    }
}

pub struct AuthTokenManager {
    http: HttpClient,
    endpoint: Url,
    policy: TokenPolicy,
}

impl AuthTokenManager {
    pub fn new(endpoints: &RemoteEndpoints, policy: TokenPolicy) -> Result<Self> {
        // The exchange has no side effects on the remote, so one retry is safe.
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(AUTH_TIMEOUT_SECS))
            .max_attempts(2)
            .retry_unsafe_methods(true)
            .build()?;

        Ok(Self { http, endpoint: endpoints.authenticate()?, policy })
    }

    /// Return `cached` while it is usable, otherwise exchange the credentials.
    pub async fn get_token(
        &self,
        credentials: &Credentials,
        cached: Option<&CachedToken>,
    ) -> Result<TokenGrant> {
        self.get_token_at(credentials, cached, Utc::now()).await
    }

    pub async fn get_token_at(
        &self,
        credentials: &Credentials,
        cached: Option<&CachedToken>,
        now: DateTime<Utc>,
    ) -> Result<TokenGrant> {
        if let Some(token) = cached.filter(|token| token.is_valid_at(&self.policy, now)) {
            debug!(issued_at = %token.issued_at, "reusing cached token");
            return Ok(TokenGrant::Cached(token.clone()));
        }

        let token = self.exchange(credentials).await?;
        info!("issued new access token");
        Ok(TokenGrant::Refreshed(CachedToken::issue(token, now, &self.policy)))
    }

    /// Check that `credentials` are accepted, without producing a token to keep.
    pub async fn validate_credentials(&self, credentials: &Credentials) -> Result<()> {
        self.exchange(credentials).await.map(|_| ())
    }

    #[instrument(skip_all, fields(client_id = %credentials.client_id))]
    async fn exchange(&self, credentials: &Credentials) -> Result<String> {
        if !credentials.is_complete() {
            return Err(CaseSyncError::Config("client id and client secret are required".into()));
        }

        let request = self.http.request(Method::POST, self.endpoint.clone()).json(&ExchangeRequest {
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
        });

        let (status, body) = self.http.send_for_text(request).await?;
        if !status.is_success() {
            return Err(classify_auth_failure(status, &body));
        }

        parse_token(&body).ok_or_else(|| {
            CaseSyncError::AuthenticationFailed("authentication response did not contain a token".into())
        })
    }
}

#[derive(Serialize)]
struct ExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

/// The endpoint answers with a bare JSON string; tolerate an unquoted body.
fn parse_token(body: &str) -> Option<String> {
    let trimmed = body.trim();
    let token = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(token)) => token,
        Ok(_) => return None,
        Err(_) => trimmed.to_string(),
    };
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
