//! Domain constants
//!
//! Defaults shared by configuration, the token policy and the link model.

// Remote service
pub const DEFAULT_BASE_URL: &str = "https://xray.cloud.getxray.app";

// Token lifecycle
pub const DEFAULT_TOKEN_VALIDITY_MINUTES: i64 = 24 * 60;
pub const DEFAULT_TOKEN_REFRESH_BUFFER_MINUTES: i64 = 30;
/// Longest validity window a configuration may declare (one year).
pub const MAX_TOKEN_VALIDITY_MINUTES: i64 = 365 * 24 * 60;

/// Substring the remote puts in its body when the client id/secret pair is wrong.
pub const INVALID_CREDENTIALS_MARKER: &str = "Invalid client credentials";

// Import job polling
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

// Bulk import wire defaults
pub const DEFAULT_TEST_TYPE: &str = "Manual";

/// Folder path meaning "no explicit placement".
pub const ROOT_FOLDER: &str = "/";
