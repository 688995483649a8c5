//! Client configuration file.
//!
//! An optional TOML file supplies the server, identity, session cookie and
//! sync timings. Command-line flags override whatever the file sets.

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use chatsync_app::SyncConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The file is not valid TOML for [`ClientConfig`].
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },

    /// A required setting is missing from both flags and file.
    #[error("missing setting `{0}` (pass --{0} or set it in the config file)")]
    Missing(&'static str),
}

/// Contents of `config.toml`.
///
/// ```toml
/// server = "http://localhost:5000"
/// username = "alice"
/// session_cookie = "session=..."
///
/// [sync]
/// presence_interval_ms = 3000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server base URL.
    pub server: Option<String>,
    /// Local username.
    pub username: Option<String>,
    /// Value of the `Cookie` header sent with every request.
    pub session_cookie: Option<String>,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Log file path.
    pub log_file: Option<PathBuf>,
    /// Sync loop timings.
    pub sync: SyncConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: None,
            username: None,
            session_cookie: None,
            request_timeout_ms: 10_000,
            log_file: None,
            sync: SyncConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }

    /// Server URL, or [`ConfigError::Missing`].
    ///
    /// # Errors
    ///
    /// Returns an error if no server is configured.
    pub fn require_server(&self) -> Result<&str, ConfigError> {
        self.server.as_deref().filter(|s| !s.trim().is_empty()).ok_or(ConfigError::Missing("server"))
    }

    /// Username, or [`ConfigError::Missing`].
    ///
    /// # Errors
    ///
    /// Returns an error if no username is configured.
    pub fn require_username(&self) -> Result<&str, ConfigError> {
        self.username
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("username"))
    }
}

/// Load config from a specific TOML file path.
///
/// Missing fields take their defaults.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or malformed.
pub fn load_from_path(path: &Path) -> Result<ClientConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let config = toml::from_str(&content)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from `path`, or from the default location when `None`.
///
/// A missing file at the default location yields defaults.
///
/// # Errors
///
/// Returns an error if an explicit file is missing, or any file is unreadable
/// or malformed.
pub fn load(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    if let Some(path) = path {
        return load_from_path(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_from_path(&path),
        _ => Ok(ClientConfig::default()),
    }
}

/// Platform config file path.
///
/// On Linux: `~/.config/chatsync/config.toml`
/// On macOS: `~/Library/Application Support/chatsync/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chatsync").join("config.toml"))
}

/// Log file used when none is configured.
///
/// On Linux: `~/.cache/chatsync/chatsync.log`
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("chatsync").join("chatsync.log"))
}
