/**
 * Login Handlers
 *
 * `GET /user/login` shows the form, `POST /user/login` authenticates.
 *
 * # Security
 *
 * - Unknown email and wrong password produce the same `Generic` failure
 * - On success the user id is stored under `currentUserID` in the session
 * - Passwords are never logged or rendered back
 */

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::backend::auth::sessions::CURRENT_USER_KEY;
use crate::backend::error::BackendError;
use crate::backend::render::{FormData, Page, PageContext, TemplateData};
use crate::backend::server::state::AppState;
use crate::shared::LoginForm;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Email or Password is incorrect";

pub async fn login_form(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<Html<String>, BackendError> {
    let data = TemplateData::default().with_form(FormData::Login(LoginForm::default()));
    page.render(&state, Page::Login, data).await
}

/// Login handler
///
/// # Returns
///
/// 303 to `/snippet/new` on success, otherwise the login page again with
/// the failures shown
pub async fn login(
    State(state): State<AppState>,
    page: PageContext,
    Form(mut form): Form<LoginForm>,
) -> Result<Response, BackendError> {
    if !form.validate() {
        return rerender(&state, &page, form).await;
    }

    let user_id = match state.credentials.verify_user(&form.email, &form.password).await {
        Ok(id) => id,
        Err(BackendError::InvalidCredentials) => {
            form.failures.add("Generic", INVALID_CREDENTIALS_MESSAGE);
            return rerender(&state, &page, form).await;
        }
        Err(e) => return Err(e),
    };

    page.session().put_int(CURRENT_USER_KEY, user_id).await?;
    Ok(Redirect::to("/snippet/new").into_response())
}

async fn rerender(
    state: &AppState,
    page: &PageContext,
    mut form: LoginForm,
) -> Result<Response, BackendError> {
    form.password.clear();
    let data = TemplateData::default().with_form(FormData::Login(form));
    Ok(page.render(state, Page::Login, data).await?.into_response())
}
