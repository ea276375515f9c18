//! Test-case records submitted for bulk import and the resulting job

use serde::{Deserialize, Deserializer, Serialize};

use crate::impl_domain_status_conversions;

/// Locally authored test case, as handed to the bulk importer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseRecord {
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Remote test type; `None` or blank means "Manual".
    #[serde(default)]
    pub test_type: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub steps: Vec<TestStep>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub project_key: String,
}

/// Single manual step; absent or null fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStep {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub action: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub result: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Handle returned by a successful bulk-import submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedImport {
    pub job_id: String,
}

/// Lifecycle of a remote import job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Working,
    Successful,
    Failed,
}

impl_domain_status_conversions!(JobStatus {
    Pending => "pending",
    Working => "working",
    Successful => "successful",
    Failed => "failed",
});

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Successful | Self::Failed)
    }
}

/// Issue created by the remote for one imported record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
}

/// Observed state of an import job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportJob {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub created_issues: Vec<CreatedIssue>,
}
