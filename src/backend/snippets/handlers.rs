/**
 * Snippet Handlers
 *
 * List, view and create snippets. Only live snippets are ever shown; the
 * store filters by expiry, so an expired id answers exactly like an
 * unknown one.
 */

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::backend::auth::sessions::FLASH_KEY;
use crate::backend::error::BackendError;
use crate::backend::render::{FormData, Page, PageContext, TemplateData};
use crate::backend::server::state::AppState;
use crate::shared::{NewSnippetForm, SnippetId};

pub const SNIPPET_SAVED_FLASH: &str = "Your snippet was saved successfully!";

/// `GET /` - the ten most recent live snippets
pub async fn home(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<Html<String>, BackendError> {
    let snippets = state.store.latest_snippets().await?;
    let data = TemplateData::default().with_snippets(snippets);
    page.render(&state, Page::Home, data).await
}

/// `GET /snippet/{id}`
///
/// # Errors
///
/// * `NotFound` - the id is not a positive integer, or no live snippet has it
pub async fn show_snippet(
    State(state): State<AppState>,
    page: PageContext,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, BackendError> {
    let id = parse_id(&raw_id).ok_or(BackendError::NotFound)?;
    let snippet = state.store.get_snippet(id).await?.ok_or(BackendError::NotFound)?;
    let data = TemplateData::default().with_snippet(snippet);
    page.render(&state, Page::ShowSnippet, data).await
}

/// `GET /snippet/new`
pub async fn new_snippet_form(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<Html<String>, BackendError> {
    let data = TemplateData::default().with_form(FormData::NewSnippet(NewSnippetForm::default()));
    page.render(&state, Page::NewSnippet, data).await
}

/// `POST /snippet/new`
///
/// # Returns
///
/// 303 to the new snippet on success, or the form again (200) with its
/// failures
pub async fn create_snippet(
    State(state): State<AppState>,
    page: PageContext,
    Form(mut form): Form<NewSnippetForm>,
) -> Result<Response, BackendError> {
    let expiry = match (form.validate(), form.expiry()) {
        (true, Some(expiry)) => expiry,
        _ => {
            let data = TemplateData::default().with_form(FormData::NewSnippet(form));
            return Ok(page.render(&state, Page::NewSnippet, data).await?.into_response());
        }
    };

    let id = state.store.insert_snippet(&form.title, &form.content, expiry).await?;
    tracing::info!(id, expires_in = expiry.as_secs(), "Snippet created");

    page.session().put_string(FLASH_KEY, SNIPPET_SAVED_FLASH).await?;
    Ok(Redirect::to(&format!("/snippet/{id}")).into_response())
}

/// Snippet ids are positive integers; anything else cannot exist.
fn parse_id(raw: &str) -> Option<SnippetId> {
    raw.parse::<SnippetId>().ok().filter(|id| *id >= 1)
}
