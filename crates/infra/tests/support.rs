//! Shared fixtures for engine integration tests

use std::sync::Arc;

use casesync_domain::{Config, PollPolicy, RemoteConfig};
use casesync_infra::{IntegrationEngine, MemoryConfigStore};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-bearer-token";

/// Mock remote API plus an in-memory config store pointing at it.
pub struct TestRemote {
    pub server: MockServer,
    pub store: Arc<MemoryConfigStore>,
}

impl TestRemote {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let config = Config {
            remote: RemoteConfig {
                base_url: server.uri(),
                client_id: "client".into(),
                client_secret: "secret".into(),
                cached_token: None,
            },
            polling: PollPolicy { max_attempts: 5, interval_ms: 10 },
            ..Config::default()
        };
        Self { server, store: Arc::new(MemoryConfigStore::new(config)) }
    }

    pub fn engine(&self) -> IntegrationEngine {
        IntegrationEngine::new(self.store.clone()).expect("engine should build")
    }

    /// Accept the configured credentials, expecting `times` exchanges.
    pub async fn mount_auth(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path("/api/v2/authenticate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(TEST_TOKEN)))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Bodies of GraphQL requests, in arrival order.
    pub async fn graphql_queries(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == "/api/v2/graphql")
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }

    pub async fn requests_to(&self, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == request_path)
            .count()
    }
}

/// GraphQL success envelope.
pub fn graphql_data(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
}

/// GraphQL error envelope with a single message.
pub fn graphql_error(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": null, "errors": [{ "message": message }] }))
}
