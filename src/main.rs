//! Shift ledger HTTP server.
//!
//! Reads its configuration from the YAML file named by `SHIFT_LEDGER_CONFIG`
//! (default `config/shift-ledger.yaml`) and serves the API on the configured
//! address.

use std::path::Path;
use std::sync::Arc;

use shift_ledger::api::{AppState, SharedStore, create_router};
use shift_ledger::config::{AppConfig, ConfigLoader};
use shift_ledger::error::EngineResult;
use shift_ledger::logging;
use shift_ledger::store::SqliteStore;
use tracing::{info, warn};

const CONFIG_ENV: &str = "SHIFT_LEDGER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/shift-ledger.yaml";

fn load_config() -> EngineResult<AppConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => Ok(ConfigLoader::load(path)?.into_config()),
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Ok(ConfigLoader::load(DEFAULT_CONFIG_PATH)?.into_config())
        }
        Err(_) => {
            warn!(path = DEFAULT_CONFIG_PATH, "No configuration file, using defaults");
            Ok(AppConfig::default())
        }
    }
}

fn open_store(config: &AppConfig) -> EngineResult<SharedStore> {
    let store = if config.database.is_in_memory() {
        warn!("Using an in-memory database; records are lost on exit");
        SqliteStore::open_in_memory()?
    } else {
        SqliteStore::open(&config.database.path)?
    };
    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = load_config()?;
    let store = open_store(&config)?;
    let address = config.server.bind_address();
    info!(
        epoch = %config.schedule.epoch,
        admins = config.access.admin_ids.len(),
        "Configuration loaded"
    );

    let router = create_router(AppState::new(config, store));
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, "Shift ledger listening");
    axum::serve(listener, router).await?;

    Ok(())
}
