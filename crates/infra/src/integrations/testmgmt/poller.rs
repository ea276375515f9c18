//! Import job status polling
//!
//! A job is polled on a fixed interval until it reports a terminal status or
//! the attempt budget runs out. Only an observed `pending`/`working` status
//! leads to another attempt; a transport failure ends the poll immediately.

use std::time::Duration;

use casesync_core::AccessTokenProvider;
use casesync_domain::{CaseSyncError, CreatedIssue, ImportJob, JobStatus, PollPolicy, Result};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::endpoints::RemoteEndpoints;
use crate::errors::{join_messages, remote_message};
use crate::http::HttpClient;

const STATUS_TIMEOUT_SECS: u64 = 30;
const FAILED_JOB_FALLBACK: &str = "Import job failed";

pub struct JobStatusPoller {
    http: HttpClient,
    endpoints: RemoteEndpoints,
    policy: PollPolicy,
}

impl JobStatusPoller {
    pub fn new(endpoints: RemoteEndpoints, policy: PollPolicy) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(STATUS_TIMEOUT_SECS))
            .max_attempts(1)
            .build()?;

        Ok(Self { http, endpoints, policy })
    }

    /// Poll with the configured policy.
    pub async fn poll(&self, job_id: &str, tokens: &dyn AccessTokenProvider) -> Result<ImportJob> {
        self.poll_with(job_id, tokens, self.policy).await
    }

    #[instrument(skip(self, tokens, policy), fields(max_attempts = policy.max_attempts))]
    pub async fn poll_with(
        &self,
        job_id: &str,
        tokens: &dyn AccessTokenProvider,
        policy: PollPolicy,
    ) -> Result<ImportJob> {
        let url = self.endpoints.job_status(job_id)?;
        let attempts = policy.max_attempts.max(1);

        for attempt in 1..=attempts {
            let token = tokens.access_token().await?;
            let request = self.http.request(Method::GET, url.clone()).bearer_auth(&token);
            let (status, body) = self.http.send_for_text(request).await?;

            if !status.is_success() {
                return Err(CaseSyncError::ImportFailed(remote_message(&body)));
            }

            let report: StatusReport = serde_json::from_str(&body).map_err(|err| {
                CaseSyncError::RemoteProtocol(format!("unreadable job status response: {err}"))
            })?;

            match report.status.parse::<JobStatus>() {
                Ok(JobStatus::Successful) => {
                    let created_issues = created_issues(&report.result);
                    info!(job_id, attempt, created = created_issues.len(), "import job succeeded");
                    return Ok(ImportJob {
                        job_id: job_id.to_string(),
                        status: JobStatus::Successful,
                        created_issues,
                    });
                }
                Ok(JobStatus::Failed) => {
                    let err = CaseSyncError::ImportFailed(failure_message(&report.result));
                    warn!(
                        job_id,
                        attempt,
                        kind = err.label(),
                        error = %err.detail(),
                        "import job failed"
                    );
                    return Err(err);
                }
                Ok(status) => debug!(job_id, attempt, ?status, "import job still running"),
                Err(_) => {
                    warn!(job_id, attempt, status = %report.status, "unrecognised job status; polling again")
                }
            }

            if attempt < attempts {
                tokio::time::sleep(policy.interval()).await;
            }
        }

        Err(CaseSyncError::PollingTimedOut { job_id: job_id.to_string(), attempts })
    }
}

#[derive(Debug, Deserialize)]
struct StatusReport {
    #[serde(default)]
    status: String,
    #[serde(default)]
    result: Value,
}

/// `result.issues`, falling back to `result.createdIssues`.
fn created_issues(result: &Value) -> Vec<CreatedIssue> {
    let entries = ["issues", "createdIssues"]
        .iter()
        .find_map(|key| result.get(*key).and_then(Value::as_array).filter(|list| !list.is_empty()));

    entries
        .map(|list| {
            list.iter()
                .filter_map(|entry| {
                    let issue = entry.get("id").and_then(scalar).zip(entry.get("key").and_then(scalar));
                    if issue.is_none() {
                        warn!(%entry, "skipping created issue without id or key");
                    }
                    issue.map(|(id, key)| CreatedIssue { id, key })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Most specific message available on a failed job.
fn failure_message(result: &Value) -> String {
    for key in ["error", "message"] {
        if let Some(message) = result.get(key).and_then(Value::as_str).filter(|m| !m.is_empty()) {
            return message.to_string();
        }
    }

    if let Some(errors) = result.get("errors").and_then(Value::as_array).filter(|e| !e.is_empty()) {
        return join_messages(errors);
    }

    match result {
        Value::Null => FAILED_JOB_FALLBACK.to_string(),
        Value::String(text) if !text.is_empty() => text.clone(),
        other => other.to_string(),
    }
}
