/**
 * Signup Handlers
 *
 * `GET /user/signup` shows the form, `POST /user/signup` registers the user.
 *
 * # Registration Process
 *
 * 1. Validate the form; on failure re-render it with the failures
 * 2. Create the user through the credential manager
 * 3. A duplicate email becomes an `Email` failure on the form
 * 4. On success, flash a confirmation and redirect to the login page
 */

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::backend::auth::sessions::FLASH_KEY;
use crate::backend::error::BackendError;
use crate::backend::render::{FormData, Page, PageContext, TemplateData};
use crate::backend::server::state::AppState;
use crate::shared::SignupForm;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "Address is already in use";
pub const SIGNUP_FLASH: &str = "Your signup was successful. Please log in.";

pub async fn signup_form(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<Html<String>, BackendError> {
    let data = TemplateData::default().with_form(FormData::Signup(SignupForm::default()));
    page.render(&state, Page::Signup, data).await
}

/// Signup handler
///
/// # Errors
///
/// Validation failures and duplicate emails are not errors; they re-render
/// the form with status 200. Storage, hashing and session faults propagate
/// as `BackendError` and become a generic 500.
pub async fn signup(
    State(state): State<AppState>,
    page: PageContext,
    Form(mut form): Form<SignupForm>,
) -> Result<Response, BackendError> {
    if !form.validate() {
        return rerender(&state, &page, form).await;
    }

    match state
        .credentials
        .create_user(&form.name, &form.email, &form.password)
        .await
    {
        Ok(_) => {}
        Err(BackendError::DuplicateEmail) => {
            form.failures.add("Email", DUPLICATE_EMAIL_MESSAGE);
            return rerender(&state, &page, form).await;
        }
        Err(e) => return Err(e),
    }

    page.session().put_string(FLASH_KEY, SIGNUP_FLASH).await?;
    Ok(Redirect::to("/user/login").into_response())
}

async fn rerender(
    state: &AppState,
    page: &PageContext,
    mut form: SignupForm,
) -> Result<Response, BackendError> {
    form.password.clear();
    let data = TemplateData::default().with_form(FormData::Signup(form));
    Ok(page.render(state, Page::Signup, data).await?.into_response())
}
