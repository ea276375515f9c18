//! Token provider backed by the persisted configuration

use std::sync::Arc;

use async_trait::async_trait;
use casesync_core::{AccessTokenProvider, ConfigStore};
use casesync_domain::Result;
use tracing::warn;

use super::token_manager::AuthTokenManager;

/// Reads credentials and the cached token from a [`ConfigStore`] and writes
/// the configuration back only when a new token was issued.
///
/// Concurrent refreshes are not deduplicated; the last write wins, which is
/// harmless because every issued token is independently valid.
pub struct TokenSession {
    store: Arc<dyn ConfigStore>,
    manager: Arc<AuthTokenManager>,
}

impl TokenSession {
    pub fn new(store: Arc<dyn ConfigStore>, manager: Arc<AuthTokenManager>) -> Self {
        Self { store, manager }
    }
}

#[async_trait]
impl AccessTokenProvider for TokenSession {
    async fn access_token(&self) -> Result<String> {
        let mut config = self.store.read_config()?;
        let grant = self
            .manager
            .get_token(&config.remote.credentials(), config.remote.cached_token.as_ref())
            .await?;

        if !grant.is_refreshed() {
            return Ok(grant.into_token().token);
        }

        let token = grant.into_token();
        let bearer = token.token.clone();
        config.remote.cached_token = Some(token);
        if let Err(err) = self.store.write_config(&config) {
            warn!(
                kind = err.label(),
                error = %err,
                "failed to persist refreshed token; continuing with it in memory"
            );
        }

        Ok(bearer)
    }
}

#[cfg(test)]
mod tests {
    use casesync_domain::{CachedToken, CaseSyncError, Config, RemoteConfig, TokenPolicy};
    use chrono::{Duration, Utc};
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::MemoryConfigStore;
    use crate::integrations::testmgmt::RemoteEndpoints;

    fn config_with(server: &MockServer, cached: Option<CachedToken>) -> Config {
        Config {
            remote: RemoteConfig {
                base_url: server.uri(),
                client_id: "client".into(),
                client_secret: "secret".into(),
                cached_token: cached,
            },
            ..Config::default()
        }
    }

    fn session(server: &MockServer, store: Arc<dyn ConfigStore>) -> TokenSession {
        let endpoints = RemoteEndpoints::new(&server.uri()).unwrap();
        let manager = AuthTokenManager::new(&endpoints, TokenPolicy::default()).unwrap();
        TokenSession::new(store, Arc::new(manager))
    }

    #[tokio::test]
    async fn persists_refreshed_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("fresh")))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryConfigStore::new(config_with(&server, None)));
        let token = session(&server, store.clone()).access_token().await.unwrap();

        assert_eq!(token, "fresh");
        let saved = store.read_config().unwrap().remote.cached_token.unwrap();
        assert_eq!(saved.token, "fresh");
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn valid_cached_token_is_not_rewritten() {
        let server = MockServer::start().await;
        let cached = CachedToken::issue("cached", Utc::now() - Duration::hours(2), &TokenPolicy::default());
        let store = Arc::new(MemoryConfigStore::new(config_with(&server, Some(cached))));

        let token = session(&server, store.clone()).access_token().await.unwrap();

        assert_eq!(token, "cached");
        assert_eq!(store.write_count(), 0);
    }

    struct ReadOnlyStore(Config);

    impl ConfigStore for ReadOnlyStore {
        fn read_config(&self) -> Result<Config> {
            Ok(self.0.clone())
        }

        fn write_config(&self, _config: &Config) -> Result<()> {
            Err(CaseSyncError::Config("read-only".into()))
        }
    }

    #[tokio::test]
    async fn write_failure_still_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("fresh")))
            .mount(&server)
            .await;

        let store = Arc::new(ReadOnlyStore(config_with(&server, None)));
        assert_eq!(session(&server, store).access_token().await.unwrap(), "fresh");
    }
}
