//! Error types used throughout the integration engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for CaseSync
///
/// The variants form a closed taxonomy: remote responses are classified into
/// one of them at the transport boundary, so callers match on kinds rather
/// than on message text.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CaseSyncError {
    /// The remote rejected the client id / secret pair.
    #[error("Authentication failed: {0}")]
    InvalidCredentials(String),

    /// Any other credential-exchange failure reported by the remote.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Import accepted without a job id")]
    ImportAcceptedWithoutJobId,

    #[error("Import failed: {0}")]
    ImportFailed(String),

    #[error("Import job {job_id} did not reach a terminal state after {attempts} status checks")]
    PollingTimedOut { job_id: String, attempts: u32 },

    /// The GraphQL envelope carried an `errors` array or an unusable `data` field.
    #[error("Remote protocol error: {0}")]
    RemoteProtocol(String),

    #[error("Project id could not be resolved: {0}")]
    ProjectIdUnresolved(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CaseSyncError {
    /// True for both authentication sub-kinds.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::InvalidCredentials(_) | Self::AuthenticationFailed(_))
    }

    /// Whether the caller may reasonably retry the same call unchanged.
    ///
    /// Polling timeouts are retriable (the job may still finish); remote
    /// rejections and bad input are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PollingTimedOut { .. } | Self::Network(_))
    }

    /// The bare message carried by the error, without the kind prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidCredentials(msg)
            | Self::AuthenticationFailed(msg)
            | Self::ImportFailed(msg)
            | Self::RemoteProtocol(msg)
            | Self::ProjectIdUnresolved(msg)
            | Self::Network(msg)
            | Self::Config(msg)
            | Self::NotFound(msg)
            | Self::InvalidInput(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::ImportAcceptedWithoutJobId | Self::PollingTimedOut { .. } => self.to_string(),
        }
    }

    /// Stable label suitable for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidCredentials(_) => "invalid_credentials",
            Self::AuthenticationFailed(_) => "authentication_failed",
            Self::ImportAcceptedWithoutJobId => "import_accepted_without_job_id",
            Self::ImportFailed(_) => "import_failed",
            Self::PollingTimedOut { .. } => "polling_timed_out",
            Self::RemoteProtocol(_) => "remote_protocol",
            Self::ProjectIdUnresolved(_) => "project_id_unresolved",
            Self::Network(_) => "network",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for CaseSync operations
pub type Result<T> = std::result::Result<T, CaseSyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_sub_kinds_share_the_user_facing_prefix() {
        let invalid = CaseSyncError::InvalidCredentials("Invalid client credentials!".into());
        let other = CaseSyncError::AuthenticationFailed("service unavailable".into());

        assert!(invalid.is_auth_error());
        assert!(other.is_auth_error());
        assert!(invalid.to_string().starts_with("Authentication failed: "));
        assert!(other.to_string().starts_with("Authentication failed: "));
        assert_ne!(invalid.label(), other.label());
    }

    #[test]
    fn labels_are_distinct_snake_case_keys() {
        let errors = [
            CaseSyncError::InvalidCredentials(String::new()),
            CaseSyncError::AuthenticationFailed(String::new()),
            CaseSyncError::ImportAcceptedWithoutJobId,
            CaseSyncError::ImportFailed(String::new()),
            CaseSyncError::PollingTimedOut { job_id: "j".into(), attempts: 1 },
            CaseSyncError::RemoteProtocol(String::new()),
            CaseSyncError::ProjectIdUnresolved(String::new()),
            CaseSyncError::Network(String::new()),
            CaseSyncError::Config(String::new()),
            CaseSyncError::NotFound(String::new()),
            CaseSyncError::InvalidInput(String::new()),
            CaseSyncError::Internal(String::new()),
        ];

        let labels: std::collections::HashSet<_> = errors.iter().map(CaseSyncError::label).collect();

        assert_eq!(labels.len(), errors.len());
        assert!(labels.iter().all(|l| l.chars().all(|c| c.is_ascii_lowercase() || c == '_')));
    }

    #[test]
    fn detail_strips_the_kind_prefix() {
        let err = CaseSyncError::RemoteProtocol("boom".into());
        assert_eq!(err.detail(), "boom");
        assert_eq!(err.to_string(), "Remote protocol error: boom");
    }

    #[test]
    fn polling_timeout_is_retryable_but_remote_failure_is_not() {
        let timeout = CaseSyncError::PollingTimedOut { job_id: "job-1".into(), attempts: 30 };
        assert!(timeout.is_retryable());
        assert!(timeout.to_string().contains("job-1"));
        assert!(!CaseSyncError::ImportFailed("bad summary".into()).is_retryable());
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(CaseSyncError::ImportFailed("x".into())).unwrap();
        assert_eq!(json["type"], "ImportFailed");
        assert_eq!(json["message"], "x");
    }
}
