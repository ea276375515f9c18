//! End-to-end tests for the integration engine against a mocked remote API
//!
//! **Coverage:**
//! - Import: submit → poll → created issues, polling cadence, auth failures
//! - Token session: refresh once, persist, reuse
//! - Reconciliation: captured link failures, folder remove-before-add,
//!   unresolved project degrading to a warning
//! - Construction: config validation, caller-supplied token providers

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use casesync_core::{AccessTokenProvider, ConfigStore};
use casesync_domain::{
    CaseSyncError, CreatedIssue, Credentials, JobStatus, LinkSelection, TestCaseRecord,
};
use serde_json::json;
use casesync_infra::{IntegrationEngine, MemoryConfigStore};
use support::{graphql_data, graphql_error, TestRemote, TEST_TOKEN};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn record(summary: &str) -> TestCaseRecord {
    TestCaseRecord { summary: summary.into(), project_key: "CALC".into(), ..TestCaseRecord::default() }
}

fn selection(plans: &[&str], folder: &str) -> LinkSelection {
    LinkSelection {
        test_plan_ids: plans.iter().map(|id| id.to_string()).collect(),
        folder_path: folder.into(),
        ..LinkSelection::default()
    }
}

// ============================================================================
// Import
// ============================================================================

#[tokio::test]
async fn submit_and_await_returns_created_issues() {
    let remote = TestRemote::start().await;
    remote.mount_auth(1).await;

    Mock::given(method("POST"))
        .and(path("/api/v2/import/test/bulk"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jobId": "job-123" })))
        .expect(1)
        .mount(&remote.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/import/test/bulk/job-123/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "successful",
            "result": { "issues": [{ "id": "i1", "key": "K-1" }] }
        })))
        .expect(1)
        .mount(&remote.server)
        .await;

    let job = remote.engine().submit_and_await(&[record("T1")]).await.unwrap();

    assert_eq!(job.job_id, "job-123");
    assert_eq!(job.status, JobStatus::Successful);
    assert_eq!(job.created_issues, vec![CreatedIssue { id: "i1".into(), key: "K-1".into() }]);
}

#[tokio::test]
async fn polling_stops_on_first_terminal_status() {
    let remote = TestRemote::start().await;
    remote.mount_auth(1).await;

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    Mock::given(method("GET"))
        .and(path("/api/v2/import/test/bulk/job-7/status"))
        .respond_with(move |_: &wiremock::Request| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                ResponseTemplate::new(200).set_body_json(json!({ "status": "working" }))
            } else {
                ResponseTemplate::new(200).set_body_json(json!({
                    "status": "successful",
                    "result": { "createdIssues": [{ "id": "i9", "key": "K-9" }] }
                }))
            }
        })
        .mount(&remote.server)
        .await;

    let job = remote.engine().await_import("job-7").await.unwrap();

    assert_eq!(job.created_issues[0].key, "K-9");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(remote.requests_to("/api/v2/import/test/bulk/job-7/status").await, 3);
}

#[tokio::test]
async fn invalid_credentials_fail_before_import() {
    let remote = TestRemote::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/authenticate"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Authentication request has failed! Invalid client credentials!"
        })))
        .mount(&remote.server)
        .await;

    let err = remote.engine().submit_import(&[record("T1")]).await.unwrap_err();

    assert!(matches!(err, CaseSyncError::InvalidCredentials(_)));
    assert_eq!(remote.requests_to("/api/v2/import/test/bulk").await, 0);
    assert!(remote.store.read_config().unwrap().remote.cached_token.is_none());
}

// ============================================================================
// Token session
// ============================================================================

#[tokio::test]
async fn token_is_exchanged_once_and_persisted() {
    let remote = TestRemote::start().await;
    remote.mount_auth(1).await;
    Mock::given(method("POST"))
        .and(path("/api/v2/graphql"))
        .respond_with(graphql_data(json!({ "getProjectSettings": { "projectId": "10000" } })))
        .expect(2)
        .mount(&remote.server)
        .await;

    let engine = remote.engine();
    assert_eq!(engine.resolve_project_id("CALC").await.unwrap(), "10000");
    assert_eq!(engine.resolve_project_id("CALC").await.unwrap(), "10000");

    let cached = remote.store.read_config().unwrap().remote.cached_token.unwrap();
    assert_eq!(cached.token, TEST_TOKEN);
    assert_eq!(remote.store.write_count(), 1);
}

#[tokio::test]
async fn credential_validation_leaves_store_untouched() {
    let remote = TestRemote::start().await;
    remote.mount_auth(1).await;

    remote.engine().validate_credentials(&Credentials::new("other", "pair")).await.unwrap();

    assert_eq!(remote.store.write_count(), 0);
    assert!(remote.store.read_config().unwrap().remote.cached_token.is_none());
}

// ============================================================================
// Reconciliation
// ============================================================================

#[tokio::test]
async fn failed_link_is_captured_and_siblings_still_run() {
    let remote = TestRemote::start().await;
    remote.mount_auth(1).await;
    Mock::given(method("POST"))
        .and(body_string_contains("addTestsToTestPlan"))
        .and(body_string_contains("\"p1\""))
        .respond_with(graphql_error("boom"))
        .mount(&remote.server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("addTestsToTestPlan"))
        .and(body_string_contains("\"p2\""))
        .respond_with(graphql_data(json!({ "addTestsToTestPlan": { "addedTests": ["t1"], "warning": null } })))
        .mount(&remote.server)
        .await;

    let engine = remote.engine();
    let diff = engine.compute_diff(&selection(&[], "/"), &selection(&["p1", "p2"], "/"));
    let result = engine.reconcile("t1", &diff, "10000").await.unwrap();

    let added = &result.test_plans.added;
    assert_eq!(added.len(), 2);
    assert_eq!(added[0].id, "p1");
    assert!(!added[0].success);
    assert_eq!(added[0].error.as_deref(), Some("boom"));
    assert!(added[1].success);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("p1") && result.warnings[0].contains("boom"));
    assert!(result.folder.is_none());
}

#[tokio::test]
async fn folder_move_removes_before_adding() {
    let remote = TestRemote::start().await;
    remote.mount_auth(1).await;
    Mock::given(method("POST"))
        .and(body_string_contains("removeTestsFromFolder"))
        .respond_with(graphql_error("Folder /A not found"))
        .expect(1)
        .mount(&remote.server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("addTestsToFolder"))
        .respond_with(graphql_data(json!({
            "addTestsToFolder": { "folder": { "name": "B", "path": "/B", "testsCount": 1 }, "warnings": null }
        })))
        .expect(1)
        .mount(&remote.server)
        .await;

    let engine = remote.engine();
    let diff = engine.compute_diff(&selection(&[], "/A"), &selection(&[], "/B"));
    let result = engine.reconcile("t1", &diff, "10000").await.unwrap();

    let queries = remote.graphql_queries().await;
    let order: Vec<bool> = queries
        .iter()
        .map(|body| body["query"].as_str().unwrap_or_default().contains("removeTestsFromFolder"))
        .collect();
    assert_eq!(order, vec![true, false]);

    let folder = result.folder.unwrap();
    assert!(!folder.removed.unwrap().success);
    assert!(folder.added.unwrap().success);
    assert!(result.warnings.iter().any(|w| w.contains("Folder /A remove failed")));
}

#[tokio::test]
async fn unresolved_project_skips_folder_only() {
    let remote = TestRemote::start().await;
    remote.mount_auth(1).await;
    Mock::given(method("POST"))
        .and(body_string_contains("getProjectSettings"))
        .respond_with(graphql_error("Project NOPE not found"))
        .mount(&remote.server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("removeTestsFromTestPlan"))
        .respond_with(graphql_data(json!({ "removeTestsFromTestPlan": { "removedTests": ["t1"], "warning": null } })))
        .expect(1)
        .mount(&remote.server)
        .await;

    let engine = remote.engine();
    let diff = engine.compute_diff(&selection(&["p1"], "/A"), &selection(&[], "/B"));
    let result = engine.reconcile_for_project_key("t1", &diff, "NOPE").await.unwrap();

    assert!(result.test_plans.removed[0].success);
    assert!(result.folder.is_none());
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("Folder linking skipped"));
    assert_eq!(remote.requests_to("/api/v2/graphql").await, 2);
}

#[tokio::test]
async fn reconciling_twice_is_safe() {
    let remote = TestRemote::start().await;
    remote.mount_auth(1).await;
    Mock::given(method("POST"))
        .and(body_string_contains("removeTestsFromTestPlan"))
        .respond_with(graphql_data(json!({
            "removeTestsFromTestPlan": { "removedTests": [], "warning": "Test t1 is not associated" }
        })))
        .expect(2)
        .mount(&remote.server)
        .await;

    let engine = remote.engine();
    let diff = engine.compute_diff(&selection(&["p1"], "/"), &selection(&[], "/"));
    let first = engine.reconcile("t1", &diff, "10000").await.unwrap();
    let second = engine.reconcile("t1", &diff, "10000").await.unwrap();

    assert!(!first.has_failures());
    assert!(!second.has_failures());
    assert!(second.warnings[0].contains("remove: Test t1 is not associated"));
}

// ============================================================================
// Construction
// ============================================================================

struct StaticTokens;

#[async_trait]
impl AccessTokenProvider for StaticTokens {
    async fn access_token(&self) -> casesync_domain::Result<String> {
        Ok(TEST_TOKEN.into())
    }
}

#[tokio::test]
async fn both_constructors_reject_invalid_config() {
    let remote = TestRemote::start().await;
    let mut config = remote.store.read_config().unwrap();
    config.token.refresh_buffer_minutes = config.token.validity_window_minutes;

    let with_provider = IntegrationEngine::with_token_provider(&config, Arc::new(StaticTokens));
    assert!(matches!(with_provider.err(), Some(CaseSyncError::Config(_))));

    let from_store = IntegrationEngine::new(Arc::new(MemoryConfigStore::new(config)));
    assert!(matches!(from_store.err(), Some(CaseSyncError::Config(_))));
}

#[tokio::test]
async fn caller_supplied_tokens_skip_the_exchange() {
    let remote = TestRemote::start().await;
    remote.mount_auth(0).await;
    Mock::given(method("POST"))
        .and(path("/api/v2/import/test/bulk"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jobId": "job-7" })))
        .expect(1)
        .mount(&remote.server)
        .await;

    let config = remote.store.read_config().unwrap();
    let engine = IntegrationEngine::with_token_provider(&config, Arc::new(StaticTokens)).unwrap();
    let submitted = engine.submit_import(&[record("T1")]).await.unwrap();

    assert_eq!(submitted.job_id, "job-7");
}
