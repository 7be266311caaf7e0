//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the
//! application configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::AppConfig;

/// Loads and provides access to the application configuration.
///
/// # File layout
///
/// ```text
/// schedule:
///   epoch: 2024-10-01
/// history:
///   recent_limit: 10
///   max_limit: 100
/// access:
///   admin_ids: [123456789]
/// database:
///   path: shift-ledger.db
/// server:
///   host: 0.0.0.0
///   port: 3000
/// ```
///
/// # Example
///
/// ```no_run
/// use shift_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/shift-ledger.yaml")?;
/// println!("Listening on {}", loader.config().server.bind_address());
/// # Ok::<(), shift_ledger::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigNotFound`] if the file cannot be read
    /// and [`EngineError::ConfigParseError`] if it is not valid configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let config = Self::load_yaml(path.as_ref())?;
        Self::validate(&config, path.as_ref())?;
        Ok(Self { config })
    }

    /// Wraps an already built configuration.
    pub fn from_config(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    fn load_yaml(path: &Path) -> EngineResult<AppConfig> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(config: &AppConfig, path: &Path) -> EngineResult<()> {
        let invalid = |message: &str| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: message.to_string(),
        };

        if config.history.recent_limit == 0 {
            return Err(invalid("history.recent_limit must be at least 1"));
        }
        if config.history.recent_limit > config.history.max_limit {
            return Err(invalid("history.recent_limit exceeds history.max_limit"));
        }
        if config.database.path.trim().is_empty() {
            return Err(invalid("database.path must not be empty"));
        }
        Ok(())
    }
}
