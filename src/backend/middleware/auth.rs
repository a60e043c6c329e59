/**
 * Login Gate
 *
 * Protects routes that need an authenticated session. Must run inside the
 * session attach stage; the gate reads the [`Session`] it left in the
 * request extensions.
 */

use axum::{
    extract::Request,
    http::{header::LOCATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::backend::auth::sessions::{Session, CURRENT_USER_KEY};
use crate::backend::error::{BackendError, SessionError};

/// Where unauthenticated requests are sent
pub const LOGIN_PATH: &str = "/user/login";

/// Redirect with 302 Found to the login page unless `currentUserID` is set.
pub async fn require_login(request: Request, next: Next) -> Result<Response, BackendError> {
    let Some(session) = request.extensions().get::<Session>().cloned() else {
        tracing::error!("Login gate ran without a session; check the pipeline order");
        return Err(SessionError::Missing.into());
    };

    if !session.exists(CURRENT_USER_KEY).await? {
        tracing::debug!(path = %request.uri().path(), "Login required, redirecting");
        return Ok((StatusCode::FOUND, [(LOCATION, LOGIN_PATH)]).into_response());
    }

    Ok(next.run(request).await)
}
