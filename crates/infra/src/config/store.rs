//! `ConfigStore` implementations
//!
//! The configuration blob doubles as the session store, so writes replace the
//! whole document. The file store writes to a sibling temp file and renames it
//! over the target, so a crash mid-write never leaves a truncated config.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use casesync_core::ConfigStore;
use casesync_domain::{CaseSyncError, Config, Result};
use parking_lot::RwLock;
use tempfile::NamedTempFile;
use tracing::debug;

use super::loader::parse_config;
use crate::errors::InfraError;

/// Config file on disk; JSON or TOML by extension.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, config: &Config) -> Result<String> {
        match self.path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::to_string_pretty(config)
                .map_err(|e| CaseSyncError::Config(format!("Cannot encode TOML config: {e}"))),
            _ => serde_json::to_string_pretty(config)
                .map_err(|e| CaseSyncError::from(InfraError::from(e))),
        }
    }
}

impl ConfigStore for FileConfigStore {
    fn read_config(&self) -> Result<Config> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            CaseSyncError::Config(format!("Failed to read {}: {e}", self.path.display()))
        })?;
        parse_config(&contents, &self.path)
    }

    fn write_config(&self, config: &Config) -> Result<()> {
        let rendered = self.render(config)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut staged = NamedTempFile::new_in(&dir).map_err(InfraError::from)?;
        staged.write_all(rendered.as_bytes()).map_err(InfraError::from)?;
        staged.as_file().sync_all().map_err(InfraError::from)?;
        staged.persist(&self.path).map_err(|e| InfraError::from(e.error))?;

        debug!(path = %self.path.display(), "configuration written");
        Ok(())
    }
}

/// In-memory store for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    config: RwLock<Config>,
    writes: AtomicUsize,
}

impl MemoryConfigStore {
    pub fn new(config: Config) -> Self {
        Self { config: RwLock::new(config), writes: AtomicUsize::new(0) }
    }

    /// Number of successful `write_config` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ConfigStore for MemoryConfigStore {
    fn read_config(&self) -> Result<Config> {
        Ok(self.config.read().clone())
    }

    fn write_config(&self, config: &Config) -> Result<()> {
        *self.config.write() = config.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
