//! Configuration loading for the shift ledger.
//!
//! This module loads the application configuration from a YAML file: the
//! shift-cycle epoch, history limits, the administrator allow-list, the
//! database location and the HTTP listener.
//!
//! # Example
//!
//! ```no_run
//! use shift_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/shift-ledger.yaml").unwrap();
//! println!("Cycle epoch: {}", config.config().schedule.epoch);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, DatabaseConfig, HistoryConfig, ScheduleConfig, ServerConfig};
