//! Port interfaces for relationship (link) mutations

use async_trait::async_trait;
use casesync_domain::{LinkCategory, Result};

/// Acknowledgement of a successful category mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAck {
    /// Raw mutation payload as returned by the remote.
    pub detail: serde_json::Value,
    /// Non-fatal advisory (e.g. "already linked").
    pub warning: Option<String>,
}

/// Acknowledgement of a successful folder mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderAck {
    pub detail: serde_json::Value,
    pub warnings: Vec<String>,
}

/// Remote operations the reconciler drives.
///
/// Implementations are not expected to retry: mutations are not guaranteed
/// to be idempotent, so retrying is left to the caller.
#[async_trait]
pub trait LinkGateway: Send + Sync {
    /// Link `test_issue_id` to the target entity of `category`.
    async fn add_link(
        &self,
        category: LinkCategory,
        target_id: &str,
        test_issue_id: &str,
    ) -> Result<LinkAck>;

    /// Unlink `test_issue_id` from the target entity of `category`.
    async fn remove_link(
        &self,
        category: LinkCategory,
        target_id: &str,
        test_issue_id: &str,
    ) -> Result<LinkAck>;

    /// Place the test in the folder at `path`.
    async fn add_to_folder(
        &self,
        project_id: &str,
        path: &str,
        test_issue_id: &str,
    ) -> Result<FolderAck>;

    /// Take the test out of the folder at `path`.
    async fn remove_from_folder(
        &self,
        project_id: &str,
        path: &str,
        test_issue_id: &str,
    ) -> Result<FolderAck>;
}
