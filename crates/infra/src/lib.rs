//! # CaseSync Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - HTTP transport with timeouts and opt-in retries
//! - Remote API adapters (authentication, bulk import, job polling, GraphQL)
//! - Configuration loading and config stores
//! - Tracing subscriber setup
//! - The [`IntegrationEngine`] facade
//!
//! ## Architecture
//! - Implements traits defined in `casesync-core`
//! - Contains all "impure" code (network and file I/O)

pub mod auth;
pub mod config;
pub mod engine;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use auth::{AuthTokenManager, TokenGrant, TokenSession};
pub use config::{FileConfigStore, MemoryConfigStore};
pub use engine::IntegrationEngine;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::testmgmt::{
    BulkImportSubmitter, GraphQlGateway, GraphQlLinkGateway, JobStatusPoller, RemoteEndpoints,
};
pub use observability::{init_tracing, TracingFormat};
