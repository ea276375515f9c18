//! Bulk import submission

use std::time::Duration;

use casesync_core::AccessTokenProvider;
use casesync_domain::constants::DEFAULT_TEST_TYPE;
use casesync_domain::{CaseSyncError, Result, SubmittedImport, TestCaseRecord, TestStep};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use url::Url;

use super::endpoints::RemoteEndpoints;
use crate::errors::remote_message;
use crate::http::HttpClient;

const IMPORT_TIMEOUT_SECS: u64 = 60;

/// Converts records into the bulk-import wire shape and submits them.
pub struct BulkImportSubmitter {
    http: HttpClient,
    endpoint: Url,
}

impl BulkImportSubmitter {
    pub fn new(endpoints: &RemoteEndpoints) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(IMPORT_TIMEOUT_SECS))
            .max_attempts(1)
            .build()?;

        Ok(Self { http, endpoint: endpoints.import_bulk()? })
    }

    /// Submit `records` as one bulk-import job and return its handle.
    ///
    /// The token is obtained before anything is sent, so authentication
    /// failures surface without an import attempt.
    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn submit(
        &self,
        records: &[TestCaseRecord],
        tokens: &dyn AccessTokenProvider,
    ) -> Result<SubmittedImport> {
        if records.is_empty() {
            return Err(CaseSyncError::InvalidInput("at least one test case is required".into()));
        }

        let token = tokens.access_token().await?;
        let payload: Vec<WireTest<'_>> = records.iter().map(WireTest::from_record).collect();

        let request = self
            .http
            .request(Method::POST, self.endpoint.clone())
            .bearer_auth(&token)
            .json(&payload);

        let (status, body) = self.http.send_for_text(request).await?;
        debug!(status = status.as_u16(), "received bulk import response");

        if !status.is_success() {
            return Err(CaseSyncError::ImportFailed(remote_message(&body)));
        }

        let job_id = serde_json::from_str::<ImportAccepted>(&body)
            .ok()
            .and_then(|accepted| accepted.job_id)
            .map(|job_id| job_id.trim().to_string())
            .filter(|job_id| !job_id.is_empty())
            .ok_or(CaseSyncError::ImportAcceptedWithoutJobId)?;

        info!(job_id = %job_id, "bulk import accepted");
        Ok(SubmittedImport { job_id })
    }
}

#[derive(Debug, Serialize)]
struct WireTest<'a> {
    testtype: &'a str,
    fields: WireFields<'a>,
    steps: Vec<WireStep<'a>>,
}

#[derive(Debug, Serialize)]
struct WireFields<'a> {
    summary: &'a str,
    project: WireProject<'a>,
    description: &'a str,
    labels: &'a [String],
}

#[derive(Debug, Serialize)]
struct WireProject<'a> {
    key: &'a str,
}

#[derive(Debug, Serialize)]
struct WireStep<'a> {
    action: &'a str,
    data: &'a str,
    result: &'a str,
}

impl<'a> WireTest<'a> {
    fn from_record(record: &'a TestCaseRecord) -> Self {
        let testtype = record
            .test_type
            .as_deref()
            .map(str::trim)
            .filter(|kind| !kind.is_empty())
            .unwrap_or(DEFAULT_TEST_TYPE);

        Self {
            testtype,
            fields: WireFields {
                summary: &record.summary,
                project: WireProject { key: &record.project_key },
                description: &record.description,
                labels: &record.labels,
            },
            steps: record.steps.iter().map(WireStep::from_step).collect(),
        }
    }
}

impl<'a> WireStep<'a> {
    fn from_step(step: &'a TestStep) -> Self {
        Self { action: &step.action, data: &step.data, result: &step.result }
    }
}

#[derive(Debug, Deserialize)]
struct ImportAccepted {
    #[serde(rename = "jobId")]
    job_id: Option<String>,
}
