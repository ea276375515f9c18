//! Configuration loader
//!
//! Loads the engine configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the credentials are not in the environment, falls back to a file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Either way the result is validated before it is returned.
//!
//! ## Environment Variables
//! - `CASESYNC_CLIENT_ID`: API client id (required)
//! - `CASESYNC_CLIENT_SECRET`: API client secret (required)
//! - `CASESYNC_BASE_URL`: Remote base URL (optional)
//! - `CASESYNC_POLL_MAX_ATTEMPTS`: Import job status checks before giving up
//! - `CASESYNC_POLL_INTERVAL_MS`: Delay between status checks
//!
//! ## File Locations
//! The loader probes the following names in the working directory, its
//! parent and grandparent, then next to the executable:
//! `casesync.json`, `casesync.toml`, `config.json`, `config.toml`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use casesync_domain::{CaseSyncError, Config, PollPolicy, RemoteConfig, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["casesync.json", "casesync.toml", "config.json", "config.toml"];
const PROBE_DIRS: [&str; 3] = [".", "..", "../.."];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `CaseSyncError::Config` if neither source yields a valid
/// configuration.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Environment configuration unavailable, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `CaseSyncError::Config` if a required variable is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let client_id = env_var("CASESYNC_CLIENT_ID")?;
    let client_secret = env_var("CASESYNC_CLIENT_SECRET")?;

    let mut remote = RemoteConfig { client_id, client_secret, ..RemoteConfig::default() };
    if let Some(base_url) = env_opt("CASESYNC_BASE_URL") {
        remote.base_url = base_url;
    }

    let defaults = PollPolicy::default();
    let polling = PollPolicy {
        max_attempts: env_parse("CASESYNC_POLL_MAX_ATTEMPTS")?.unwrap_or(defaults.max_attempts),
        interval_ms: env_parse("CASESYNC_POLL_INTERVAL_MS")?.unwrap_or(defaults.interval_ms),
    };

    let config = Config { remote, polling, ..Config::default() };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations via
/// [`probe_config_paths`].
///
/// # Errors
/// Returns `CaseSyncError::Config` if the file is missing, unreadable,
/// malformed or fails validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CaseSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CaseSyncError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CaseSyncError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration by file extension (`.json` or `.toml`).
pub(crate) fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CaseSyncError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CaseSyncError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(CaseSyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Return the first existing config file in the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| PROBE_DIRS.iter().map(move |dir| root.join(dir)))
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        CaseSyncError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Non-blank value of `key`, if set.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| CaseSyncError::Config(format!("Invalid {key}: {e}")))
        })
        .transpose()
}
