//! # CaseSync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Link diff computation and the reconciliation service
//! - Port/adapter interfaces (traits) for remote link mutations, token
//!   provisioning and configuration storage
//!
//! ## Architecture Principles
//! - Only depends on `casesync-domain`
//! - No HTTP, file or platform code
//! - All external dependencies via traits

pub mod links;
pub mod session_ports;

// Re-export specific items to avoid ambiguity
pub use links::{
    compute_diff, normalize_folder_path, FolderAck, LinkAck, LinkGateway, LinkReconciler,
};
pub use session_ports::{AccessTokenProvider, ConfigStore};
