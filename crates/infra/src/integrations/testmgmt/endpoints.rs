//! Remote endpoint addresses derived from the configured base URL

use casesync_domain::{CaseSyncError, Result};
use url::Url;

const API_PREFIX: &str = "api/v2";

/// Resolved URLs of the remote test-management API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoints {
    base: Url,
}

impl RemoteEndpoints {
    /// Parse and validate a base URL such as `https://xray.cloud.getxray.app`.
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim();
        let mut base = Url::parse(trimmed)
            .map_err(|err| CaseSyncError::Config(format!("invalid base URL '{trimmed}': {err}")))?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(CaseSyncError::Config(format!(
                "base URL must use http or https, got '{}'",
                base.scheme()
            )));
        }

        // Url::join replaces the last segment unless the path ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { base })
    }

    pub fn authenticate(&self) -> Result<Url> {
        self.join("authenticate")
    }

    pub fn import_bulk(&self) -> Result<Url> {
        self.join("import/test/bulk")
    }

    pub fn job_status(&self, job_id: &str) -> Result<Url> {
        if job_id.trim().is_empty() {
            return Err(CaseSyncError::InvalidInput("job id must not be empty".into()));
        }
        let mut url = self.import_bulk()?;
        url.path_segments_mut()
            .map_err(|_| CaseSyncError::Config("base URL cannot carry a path".into()))?
            .push(job_id)
            .push("status");
        Ok(url)
    }

    pub fn graphql(&self) -> Result<Url> {
        self.join("graphql")
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base
            .join(&format!("{API_PREFIX}/{path}"))
            .map_err(|err| CaseSyncError::Config(format!("cannot build endpoint URL: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_urls() {
        let endpoints = RemoteEndpoints::new("https://xray.cloud.getxray.app").unwrap();

        assert_eq!(
            endpoints.authenticate().unwrap().as_str(),
            "https://xray.cloud.getxray.app/api/v2/authenticate"
        );
        assert_eq!(
            endpoints.job_status("job-123").unwrap().as_str(),
            "https://xray.cloud.getxray.app/api/v2/import/test/bulk/job-123/status"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let endpoints = RemoteEndpoints::new("http://127.0.0.1:9000/proxy").unwrap();
        assert_eq!(endpoints.graphql().unwrap().as_str(), "http://127.0.0.1:9000/proxy/api/v2/graphql");
    }

    #[test]
    fn job_ids_are_escaped_as_a_single_segment() {
        let endpoints = RemoteEndpoints::new("https://example.test/").unwrap();
        let url = endpoints.job_status("a/b").unwrap();
        assert_eq!(url.path(), "/api/v2/import/test/bulk/a%2Fb/status");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(RemoteEndpoints::new("not a url"), Err(CaseSyncError::Config(_))));
        assert!(matches!(RemoteEndpoints::new("ftp://example.test"), Err(CaseSyncError::Config(_))));
        let endpoints = RemoteEndpoints::new("https://example.test").unwrap();
        assert!(matches!(endpoints.job_status(" "), Err(CaseSyncError::InvalidInput(_))));
    }
}
