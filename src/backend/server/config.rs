/**
 * Server Configuration
 *
 * Loads the [`AppConfig`] from the process environment and opens the
 * content store it describes.
 *
 * # Error Handling
 *
 * Unlike optional services, configuration and storage are required: an
 * invalid variable or an unreachable database stops startup with an error
 * instead of running with defaults.
 */

use std::sync::Arc;

use crate::backend::error::StorageError;
use crate::backend::store::{Clock, ContentStore};
use crate::shared::{AppConfig, ConfigError};

/// Load configuration from environment variables.
///
/// Call `dotenv::dotenv()` first if a `.env` file should be honoured.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let config = AppConfig::from_env()?;
    tracing::info!(
        addr = %config.addr,
        static_dir = %config.static_dir.display(),
        session_lifetime_secs = config.session_lifetime.as_secs(),
        secure_cookies = config.secure_cookies,
        store_timeout_ms = config.store_timeout.as_millis() as u64,
        bcrypt_cost = config.bcrypt_cost,
        "Configuration loaded"
    );
    Ok(config)
}

/// Connect to the database and run migrations.
pub async fn load_store(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<ContentStore, StorageError> {
    ContentStore::connect(config, clock).await.map_err(|e| {
        tracing::error!("Failed to open content store: {:?}", e);
        e
    })
}
