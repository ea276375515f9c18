//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use casesync_domain::CaseSyncError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CaseSyncError);

impl From<InfraError> for CaseSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CaseSyncError> for InfraError {
    fn from(value: CaseSyncError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoCaseSyncError {
    fn into_casesync(self) -> CaseSyncError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CaseSyncError */
/* -------------------------------------------------------------------------- */

impl IntoCaseSyncError for HttpError {
    fn into_casesync(self) -> CaseSyncError {
        if self.is_timeout() {
            return CaseSyncError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return CaseSyncError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return CaseSyncError::RemoteProtocol(format!("malformed response body: {self}"));
        }

        if self.is_builder() {
            return CaseSyncError::Internal(format!("invalid HTTP request: {self}"));
        }

        CaseSyncError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_casesync())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → CaseSyncError */
/* -------------------------------------------------------------------------- */

impl IntoCaseSyncError for IoError {
    fn into_casesync(self) -> CaseSyncError {
        match self.kind() {
            std::io::ErrorKind::NotFound => CaseSyncError::NotFound(self.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                CaseSyncError::Config(format!("permission denied: {self}"))
            }
            _ => CaseSyncError::Internal(format!("I/O failure: {self}")),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_casesync())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → CaseSyncError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(CaseSyncError::Config(format!("invalid JSON: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
