/**
 * Logout Handler
 *
 * `POST /user/logout`. Sits behind the login gate and the CSRF check.
 */

use axum::response::Redirect;

use crate::backend::auth::sessions::{Session, CURRENT_USER_KEY, FLASH_KEY};
use crate::backend::error::BackendError;

pub const LOGOUT_FLASH: &str = "You've been logged out successfully!";

/// Clears `currentUserID` and redirects home with a flash message.
pub async fn logout(session: Session) -> Result<Redirect, BackendError> {
    let user_id = session.get_int(CURRENT_USER_KEY).await?;
    session.remove(CURRENT_USER_KEY).await?;
    session.put_string(FLASH_KEY, LOGOUT_FLASH).await?;
    tracing::info!(user_id = ?user_id, "User logged out");
    Ok(Redirect::to("/"))
}
