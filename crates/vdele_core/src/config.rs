//! Application configuration loading.
//!
//! # Responsibility
//! - Load the TOML config file and supply defaults for optional settings.
//! - Validate the remote endpoint shape before any network use.
//!
//! # Invariants
//! - A missing config file yields pure defaults (local-only mode).
//! - `[remote]` is required for sync; everything else has defaults.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DB_PATH: &str = "vdele.db";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration error for file loading and validation.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Endpoint is present but not an http(s) URL.
    InvalidEndpoint(String),
    /// Sync was requested without a `[remote]` section.
    MissingRemote,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "cannot parse config `{}`: {source}", path.display())
            }
            Self::InvalidEndpoint(value) => {
                write!(f, "remote endpoint is not an http(s) URL: `{value}`")
            }
            Self::MissingRemote => {
                write!(f, "config has no [remote] section; sync is unavailable")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Remote spreadsheet endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteConfig {
    /// Apps-Script-style web endpoint serving the board API.
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Local cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// File logging settings; logging stays off when `dir` is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub dir: Option<PathBuf>,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads the config file; a missing file yields defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        };

        let config: Self = toml::from_str(&raw).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            source: err,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the remote settings, or an error when sync is unconfigured.
    pub fn require_remote(&self) -> Result<&RemoteConfig, ConfigError> {
        self.remote.as_ref().ok_or(ConfigError::MissingRemote)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(remote) = &self.remote {
            let endpoint = remote.endpoint.trim();
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::InvalidEndpoint(remote.endpoint.clone()));
            }
        }
        Ok(())
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_PATH)
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
