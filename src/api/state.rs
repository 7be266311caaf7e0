//! Application state for the shift ledger API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::access::AccessPolicy;
use crate::calculation::ShiftCycle;
use crate::config::AppConfig;
use crate::error::{EngineError, EngineResult};
use crate::session::EntrySession;
use crate::store::RecordStore;

/// A record store that can be shared across request handlers.
pub type SharedStore = Arc<dyn RecordStore + Send + Sync>;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration, the record store and the open entry sessions.
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    store: SharedStore,
    sessions: Arc<Mutex<HashMap<i64, EntrySession>>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: AppConfig, store: SharedStore) -> Self {
        Self {
            config: Arc::new(config),
            store,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the record store.
    pub fn store(&self) -> &(dyn RecordStore + Send + Sync) {
        self.store.as_ref()
    }

    /// Returns the configured shift cycle.
    pub fn cycle(&self) -> ShiftCycle {
        self.config.schedule.cycle()
    }

    /// Returns the administrator allow-list.
    pub fn access(&self) -> &AccessPolicy {
        &self.config.access
    }

    /// Locks the entry sessions, keyed by employee id.
    pub fn sessions(&self) -> EngineResult<MutexGuard<'_, HashMap<i64, EntrySession>>> {
        self.sessions.lock().map_err(|e| EngineError::Storage {
            message: format!("session table lock poisoned: {}", e),
        })
    }
}
