/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router and wraps it in the
 * global middleware pipeline.
 *
 * # Route Order
 *
 * 1. Snippet routes (home, show, create)
 * 2. User routes (signup, login, logout)
 * 3. Static files under `/static`
 * 4. Fallback (404)
 *
 * `/snippet/new` is a static segment and takes precedence over
 * `/snippet/{id}`.
 */

use axum::Router;
use tower_http::services::ServeDir;

use crate::backend::error::BackendError;
use crate::backend::middleware::{Pipeline, PipelineError};
use crate::backend::routes::snippet_routes::configure_snippet_routes;
use crate::backend::routes::user_routes::configure_user_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state shared by handlers and stages
///
/// # Errors
///
/// Returns a [`PipelineError`] if the global pipeline on its own, or the
/// global pipeline around the login gate, is not a valid order.
pub fn create_router(app_state: AppState) -> Result<Router<()>, PipelineError> {
    let global = Pipeline::standard();
    let gate = Pipeline::login_required();

    global.validate()?;
    let realised = global.then(&gate);
    realised.validate()?;
    tracing::debug!(stages = ?realised.stages(), "Middleware pipeline validated");

    let router = Router::new();
    let router = configure_snippet_routes(router, &gate, &app_state);
    let router = configure_user_routes(router, &gate, &app_state);

    let router = router
        .nest_service("/static", ServeDir::new(&app_state.config.static_dir))
        .fallback(|| async { BackendError::NotFound });

    let router = global.apply(router, &app_state);

    Ok(router.with_state(app_state))
}
