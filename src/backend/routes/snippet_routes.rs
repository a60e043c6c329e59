/**
 * Snippet Routes
 *
 * # Routes
 *
 * - `GET /` - Home page, latest snippets
 * - `GET /snippet/{id}` - Show one live snippet
 * - `GET /snippet/new` - Snippet form (login required)
 * - `POST /snippet/new` - Create a snippet (login required)
 */

use axum::{routing::get, Router};

use crate::backend::middleware::Pipeline;
use crate::backend::server::state::AppState;
use crate::backend::snippets::{create_snippet, home, new_snippet_form, show_snippet};

/// Configure snippet routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
/// * `gate` - Pipeline wrapped around the routes that need a logged-in user
/// * `state` - Application state handed to stateful stages
pub fn configure_snippet_routes(
    router: Router<AppState>,
    gate: &Pipeline,
    state: &AppState,
) -> Router<AppState> {
    let gated = Router::new().route("/snippet/new", get(new_snippet_form).post(create_snippet));

    router
        .route("/", get(home))
        .route("/snippet/{id}", get(show_snippet))
        .merge(gate.apply_to_routes(gated, state))
}
