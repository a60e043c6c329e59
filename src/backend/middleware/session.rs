/**
 * Session Attach Stage
 *
 * Resolves the `session` cookie to a [`Session`] handle, stores the handle in
 * the request extensions, and once the inner stages have produced a
 * response, issues the cookie if anything was written to the session.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::sessions::Session;
use crate::backend::error::BackendError;
use crate::backend::middleware::cookies::{read_cookie, SetCookie};
use crate::backend::server::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Fails with a generic 500 if the session store cannot be reached; the
/// client's cookie is left untouched in that case.
pub async fn attach_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = read_cookie(request.headers(), SESSION_COOKIE);
    let session = state.sessions.load(token.as_deref()).await?;
    if token.is_some() && session.is_new() {
        tracing::debug!("Unknown or expired session token replaced");
    }

    request.extensions_mut().insert(session.clone());
    let mut response = next.run(request).await;

    if session.was_written() {
        SetCookie::new(SESSION_COOKIE, session.token())
            .max_age(state.sessions.lifetime())
            .same_site_lax()
            .secure(state.config.secure_cookies)
            .append_to(response.headers_mut());
    }
    Ok(response)
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Session>().cloned().ok_or_else(|| {
            tracing::error!("Session not found in request extensions");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}
