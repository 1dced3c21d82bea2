//! Service configuration
//!
//! Loaded from a JSON file. Every field has a default, so `{}` is a valid
//! configuration; values are validated after parsing.
//!
//! ```json
//! {
//!   "log_level": "info",
//!   "database": { "path": "./committees.db", "busy_timeout_ms": 5000 },
//!   "http": { "host": "0.0.0.0", "port": 54321, "cors_origins": [] },
//!   "slots": { "aggregate_mode": "delta", "min_total_slots": null, "decrement_on_delete": false }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_server::HttpServerConfig;
use crate::observability::Severity;
use crate::slots::SlotPolicy;
use crate::store::{Database, DatabaseLocation};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    /// File is not valid JSON for `Config`
    #[error("Invalid config JSON: {0}")]
    Parse(String),

    /// A value is out of range
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path; `":memory:"` selects a private in-memory database
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Wait on a locked database before a statement fails
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_database_path() -> String {
    "./committees.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    pub fn location(&self) -> DatabaseLocation {
        if self.path == ":memory:" {
            DatabaseLocation::Memory
        } else {
            DatabaseLocation::File(PathBuf::from(&self.path))
        }
    }

    /// Build the (not yet opened) database handle
    pub fn open(&self) -> Database {
        Database::new(self.location(), Duration::from_millis(self.busy_timeout_ms))
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Minimum log severity: trace, info, warn, error, fatal
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub slots: SlotPolicy,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            database: DatabaseConfig::default(),
            http: HttpServerConfig::default(),
            slots: SlotPolicy::default(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Config =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        self.severity()?;

        if self.database.path.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "database.path",
                reason: "must not be empty".to_string(),
            });
        }

        if self.database.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "database.busy_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }

        if let Some(min) = self.slots.min_total_slots {
            if min < 0 {
                return Err(ConfigError::Invalid {
                    field: "slots.min_total_slots",
                    reason: format!("must be >= 0, got {}", min),
                });
            }
        }

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(|reason| ConfigError::Invalid {
                field: "log_level",
                reason,
            })
    }
}
