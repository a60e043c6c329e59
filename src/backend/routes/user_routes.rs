/**
 * User Routes
 *
 * # Routes
 *
 * - `GET /user/signup` - Signup form
 * - `POST /user/signup` - Register
 * - `GET /user/login` - Login form
 * - `POST /user/login` - Authenticate
 * - `POST /user/logout` - Log out (login required)
 */

use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::auth::{login, login_form, logout, signup, signup_form};
use crate::backend::middleware::Pipeline;
use crate::backend::server::state::AppState;

/// Configure user routes
///
/// Signup and login stay public; logout sits behind `gate`.
pub fn configure_user_routes(
    router: Router<AppState>,
    gate: &Pipeline,
    state: &AppState,
) -> Router<AppState> {
    let gated = Router::new().route("/user/logout", post(logout));

    router
        .route("/user/signup", get(signup_form).post(signup))
        .route("/user/login", get(login_form).post(login))
        .merge(gate.apply_to_routes(gated, state))
}
