//! Configuration types for the shift ledger.
//!
//! These types mirror the structure of the YAML configuration file. Every
//! section has defaults, so a file only needs to list what it changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::access::AccessPolicy;
use crate::calculation::ShiftCycle;

/// Shift pattern settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// The date on which crew 1 works its day shift.
    pub epoch: NaiveDate,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            epoch: ShiftCycle::DEFAULT_EPOCH,
        }
    }
}

impl ScheduleConfig {
    /// Returns the shift cycle anchored at the configured epoch.
    pub fn cycle(&self) -> ShiftCycle {
        ShiftCycle::new(self.epoch)
    }
}

/// Record history settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// How many records the recent-records listing returns by default.
    pub recent_limit: usize,
    /// Upper bound a caller may request.
    pub max_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            recent_limit: 10,
            max_limit: 100,
        }
    }
}

/// Database location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path of the SQLite file; `:memory:` for a throwaway database.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "shift-ledger.db".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Returns true when the database lives only in memory.
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Returns `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Shift pattern settings.
    pub schedule: ScheduleConfig,
    /// Record history settings.
    pub history: HistoryConfig,
    /// Administrator allow-list.
    pub access: AccessPolicy,
    /// Database location.
    pub database: DatabaseConfig,
    /// HTTP listener settings.
    pub server: ServerConfig,
}
