//! Session port interfaces
//!
//! The engine never owns persistent state. Configuration (including the
//! cached bearer token) is read from and written back to a [`ConfigStore`]
//! owned by the caller, and every remote call asks an
//! [`AccessTokenProvider`] for a usable token.

use async_trait::async_trait;
use casesync_domain::{Config, Result};

/// Provides bearer tokens for the remote API.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Return a token that is valid for at least the refresh buffer.
    ///
    /// Implementations refresh (and persist) the token when the cached one
    /// is missing or stale.
    async fn access_token(&self) -> Result<String>;
}

/// Storage for the configuration blob that doubles as the session store.
pub trait ConfigStore: Send + Sync {
    /// Read the current configuration.
    fn read_config(&self) -> Result<Config>;

    /// Replace the stored configuration wholesale.
    fn write_config(&self, config: &Config) -> Result<()>;
}
