//! GraphQL transport for relationship queries and mutations
//!
//! Stateless: every call carries its own bearer token. Calls are sent once;
//! mutations are not assumed to be idempotent, so retrying is left to callers.

use std::time::Duration;

use casesync_domain::{CaseSyncError, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::endpoints::RemoteEndpoints;
use crate::errors::remote_message;
use crate::http::HttpClient;

const GRAPHQL_TIMEOUT_SECS: u64 = 30;
const UNKNOWN_GRAPHQL_ERROR: &str = "Unknown GraphQL error";

pub struct GraphQlGateway {
    http: HttpClient,
    endpoint: Url,
}

impl GraphQlGateway {
    pub fn new(endpoints: &RemoteEndpoints) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(GRAPHQL_TIMEOUT_SECS))
            .max_attempts(1)
            .build()?;

        Ok(Self { http, endpoint: endpoints.graphql()? })
    }

    /// Post `{query, variables}` and unwrap the `data` member of the envelope.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        token: &str,
        query: &str,
        variables: Value,
    ) -> Result<T> {
        let request = self
            .http
            .request(Method::POST, self.endpoint.clone())
            .bearer_auth(token)
            .json(&GraphQlRequest { query, variables: &variables });

        let (status, body) = self.http.send_for_text(request).await?;
        debug!(status = status.as_u16(), "received GraphQL response");

        let envelope = match serde_json::from_str::<GraphQlResponse<T>>(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(CaseSyncError::Network(format!(
                    "GraphQL endpoint returned HTTP {}: {}",
                    status.as_u16(),
                    remote_message(&body)
                )));
            }
            Err(err) => {
                return Err(CaseSyncError::RemoteProtocol(format!(
                    "failed to parse GraphQL response: {err}"
                )));
            }
        };

        if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
            let message = errors
                .into_iter()
                .next()
                .and_then(|error| error.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| UNKNOWN_GRAPHQL_ERROR.to_string());
            return Err(CaseSyncError::RemoteProtocol(message));
        }

        if !status.is_success() {
            return Err(CaseSyncError::Network(format!(
                "GraphQL endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        envelope
            .data
            .ok_or_else(|| CaseSyncError::RemoteProtocol("GraphQL response missing data field".into()))
    }
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn gateway(server: &MockServer) -> GraphQlGateway {
        GraphQlGateway::new(&RemoteEndpoints::new(&server.uri()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn returns_data_and_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/graphql"))
            .and(header("authorization", "Bearer tok"))
            .and(body_partial_json(json!({ "variables": { "issueId": "p1" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "addTestsToTestPlan": { "addedTests": ["t1"], "warning": null } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data: Value = gateway(&server)
            .await
            .execute("tok", "mutation {}", json!({ "issueId": "p1" }))
            .await
            .unwrap();

        assert_eq!(data["addTestsToTestPlan"]["addedTests"][0], "t1");
    }

    #[tokio::test]
    async fn errors_array_becomes_remote_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Test Plan p9 not found" }, { "message": "second" }]
            })))
            .mount(&server)
            .await;

        let result = gateway(&server).await.execute::<Value>("tok", "query {}", json!({})).await;

        assert_eq!(result.unwrap_err(), CaseSyncError::RemoteProtocol("Test Plan p9 not found".into()));
    }

    #[tokio::test]
    async fn errors_without_message_use_generic_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "errors": [{ "code": 1 }] })),
            )
            .mount(&server)
            .await;

        let result = gateway(&server).await.execute::<Value>("tok", "query {}", json!({})).await;

        assert_eq!(result.unwrap_err(), CaseSyncError::RemoteProtocol(UNKNOWN_GRAPHQL_ERROR.into()));
    }

    #[tokio::test]
    async fn empty_errors_array_is_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "ok": true }, "errors": [] })),
            )
            .mount(&server)
            .await;

        let data: Value = gateway(&server).await.execute("tok", "query {}", json!({})).await.unwrap();
        assert_eq!(data["ok"], true);
    }

    #[tokio::test]
    async fn non_json_failure_is_a_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .expect(1)
            .mount(&server)
            .await;

        let result = gateway(&server).await.execute::<Value>("tok", "query {}", json!({})).await;

        assert!(matches!(result, Err(CaseSyncError::Network(msg)) if msg.contains("502")));
    }

    #[tokio::test]
    async fn missing_data_is_a_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let result = gateway(&server).await.execute::<Value>("tok", "query {}", json!({})).await;
        assert!(matches!(result, Err(CaseSyncError::RemoteProtocol(_))));
    }
}
