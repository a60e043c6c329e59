/**
 * CSRF Protection Stage
 *
 * Double-submit token check. The token lives in an HttpOnly `csrf_token`
 * cookie and is handed to handlers through the [`CsrfToken`] extension so
 * pages can embed it in their forms.
 *
 * # Checks
 *
 * Safe methods (GET, HEAD, OPTIONS, TRACE) pass through and receive a
 * cookie if they arrived without one. Every other method must echo the
 * cookie's token in the `X-CSRF-Token` header or the `csrf_token` field of
 * an urlencoded body, or the request is rejected with 400 and the inner
 * stages never run.
 */

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header::CONTENT_TYPE, HeaderName, Method},
    middleware::Next,
    response::Response,
};

use crate::backend::error::BackendError;
use crate::backend::middleware::cookies::{read_cookie, SetCookie};
use crate::backend::server::state::AppState;

pub const CSRF_COOKIE: &str = "csrf_token";
pub const CSRF_FORM_FIELD: &str = "csrf_token";
pub const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");

/// Largest form body buffered for the token lookup
const MAX_FORM_BYTES: usize = 1024 * 1024;

/// The anti-forgery token for the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub(crate) fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Only tokens this service could have minted are accepted from cookies.
    fn parse(raw: &str) -> Option<Self> {
        (raw.len() == 32 && raw.bytes().all(|b| b.is_ascii_hexdigit())).then(|| Self(raw.to_string()))
    }

    fn matches(&self, supplied: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), supplied.as_bytes())
    }
}

fn is_state_changing(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn is_urlencoded(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

fn form_token(body: &Bytes) -> Option<String> {
    url::form_urlencoded::parse(body)
        .find(|(key, _)| key == CSRF_FORM_FIELD)
        .map(|(_, value)| value.into_owned())
}

/// Pull the submitted token out of the request, buffering and restoring the
/// body when the token has to come from the form.
async fn supplied_token(request: Request) -> Result<(Option<String>, Request), BackendError> {
    if let Some(token) = request.headers().get(CSRF_HEADER).and_then(|v| v.to_str().ok()) {
        let token = token.to_string();
        return Ok((Some(token), request));
    }
    if !is_urlencoded(&request) {
        return Ok((None, request));
    }

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_FORM_BYTES).await.map_err(|e| {
        tracing::warn!(error = %e, "CSRF check could not read form body");
        BackendError::CsrfRejected
    })?;
    let token = form_token(&bytes);
    Ok((token, Request::from_parts(parts, Body::from(bytes))))
}

pub async fn csrf_protect(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let existing = read_cookie(request.headers(), CSRF_COOKIE).and_then(|raw| CsrfToken::parse(&raw));
    let issued = existing.is_none();
    let token = existing.unwrap_or_else(CsrfToken::generate);

    let mut request = if is_state_changing(request.method()) {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let (supplied, request) = supplied_token(request).await?;
        let valid = !issued && supplied.as_deref().is_some_and(|s| token.matches(s));
        if !valid {
            tracing::warn!(%method, %path, had_cookie = !issued, "CSRF token mismatch");
            return Err(BackendError::CsrfRejected);
        }
        request
    } else {
        request
    };

    request.extensions_mut().insert(token.clone());
    let mut response = next.run(request).await;

    if issued {
        SetCookie::new(CSRF_COOKIE, token.as_str())
            .secure(state.config.secure_cookies)
            .append_to(response.headers_mut());
    }
    Ok(response)
}
