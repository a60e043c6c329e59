/**
 * Server Initialization
 *
 * Builds the application state and router.
 *
 * # Initialization Flow
 *
 * 1. **Configuration**: validate the supplied `AppConfig`
 * 2. **Storage**: open the SQLite pool and run migrations
 * 3. **State Creation**: credential manager, session manager, renderer
 * 4. **Background Tasks**: periodic sweep of expired sessions
 * 5. **Router Creation**: routes plus the validated middleware pipeline
 */

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use thiserror::Error;

use crate::backend::auth::SessionManager;
use crate::backend::error::StorageError;
use crate::backend::middleware::PipelineError;
use crate::backend::render::{HtmlRenderer, Renderer};
use crate::backend::routes::create_router;
use crate::backend::server::config::load_store;
use crate::backend::server::state::AppState;
use crate::backend::store::{Clock, SystemClock};
use crate::shared::{AppConfig, ConfigError};

/// How often expired sessions are evicted
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Startup failures
#[derive(Debug, Error)]
pub enum InitError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("storage unavailable: {0}")]
    Storage(#[from] StorageError),

    #[error("invalid middleware pipeline: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Create the application with the wall clock and the built-in renderer.
pub async fn create_app(config: AppConfig) -> Result<Router, InitError> {
    create_app_with(config, Arc::new(SystemClock), Arc::new(HtmlRenderer)).await
}

/// Create the application with an explicit clock and renderer.
pub async fn create_app_with(
    config: AppConfig,
    clock: Arc<dyn Clock>,
    renderer: Arc<dyn Renderer>,
) -> Result<Router, InitError> {
    tracing::info!("Initializing Snippetbox server");

    let state = create_state(config, clock, renderer).await?;
    spawn_session_sweep(state.sessions.clone());

    let router = create_router(state)?;
    tracing::info!("Router configured with periodic session sweep");
    Ok(router)
}

/// Validate `config`, open the store and assemble the [`AppState`].
pub async fn create_state(
    config: AppConfig,
    clock: Arc<dyn Clock>,
    renderer: Arc<dyn Renderer>,
) -> Result<AppState, InitError> {
    config.validate()?;
    let store = load_store(&config, clock.clone()).await?;
    tracing::info!("Content store ready");
    Ok(AppState::new(config, store, clock, renderer))
}

fn spawn_session_sweep(sessions: SessionManager) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let evicted = sessions.sweep_expired().await;
            if evicted > 0 {
                tracing::debug!(evicted, "Swept expired sessions");
            }
        }
    });
}
