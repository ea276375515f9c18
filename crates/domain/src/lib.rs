//! # CaseSync Domain
//!
//! Domain types for syncing local test cases with a remote test-management
//! service.
//!
//! This crate contains:
//! - Error taxonomy and Result alias
//! - Configuration structures (remote endpoint, token and polling policy)
//! - Import records, job state and relationship (link) models
//!
//! ## Architecture
//! - No dependencies on other CaseSync crates
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
