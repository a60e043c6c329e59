/**
 * Page Context Extractor
 *
 * Collects what every page needs from the request: the session handle and
 * CSRF token left in the extensions by the pipeline, and the request path.
 */

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::Html,
};
use chrono::Datelike;

use crate::backend::auth::sessions::{Session, CURRENT_USER_KEY, FLASH_KEY};
use crate::backend::error::BackendError;
use crate::backend::middleware::csrf::CsrfToken;
use crate::backend::render::{Page, TemplateData};
use crate::backend::server::state::AppState;

/// Request-scoped rendering context
#[derive(Debug, Clone)]
pub struct PageContext {
    session: Session,
    csrf_token: CsrfToken,
    path: String,
}

impl PageContext {
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Render `page`, filling in the per-request fields of `data`.
    ///
    /// Pops the flash message, so a flash is delivered by exactly one page.
    /// If rendering fails the flash is put back for the next page.
    pub async fn render(
        &self,
        state: &AppState,
        page: Page,
        mut data: TemplateData,
    ) -> Result<Html<String>, BackendError> {
        data.path = self.path.clone();
        data.current_year = state.store.now().year();
        data.csrf_token = self.csrf_token.as_str().to_string();
        data.is_authenticated = self.session.exists(CURRENT_USER_KEY).await?;
        data.flash = self.session.pop_string(FLASH_KEY).await?;

        match state.renderer.render(page, &data) {
            Ok(body) => {
                tracing::debug!(page = page.name(), "page rendered");
                Ok(Html(body))
            }
            Err(err) => {
                if let Some(flash) = data.flash.take() {
                    self.session.put_string(FLASH_KEY, flash).await?;
                }
                Err(err.into())
            }
        }
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().cloned().ok_or_else(|| {
            tracing::error!("Session not found in request extensions");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        let csrf_token = parts.extensions.get::<CsrfToken>().cloned().ok_or_else(|| {
            tracing::error!("CsrfToken not found in request extensions");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

        Ok(Self {
            session,
            csrf_token,
            path: parts.uri.path().to_string(),
        })
    }
}
