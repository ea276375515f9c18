//! Configuration loading and storage
//!
//! This module provides utilities for loading the engine configuration from
//! environment variables and files, and the stores the session layer writes
//! refreshed tokens back through.

pub mod loader;
pub mod store;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
pub use store::{FileConfigStore, MemoryConfigStore};
