/**
 * Backend Error Types
 *
 * This module defines the closed set of errors the backend can produce.
 * Handlers and middleware return [`BackendError`]; the storage, session and
 * rendering layers have their own narrower errors that convert into it.
 *
 * # Error Categories
 *
 * ## Domain errors
 *
 * Expected outcomes that handlers usually turn into a user-facing message:
 * - `NotFound` - snippet absent or expired
 * - `DuplicateEmail` - signup with an email already on file
 * - `InvalidCredentials` - unknown email or wrong password (indistinguishable)
 * - `CsrfRejected` - state-changing request without a matching token
 *
 * ## Server errors
 *
 * Faults that are logged in full and surfaced as a bare 500:
 * - `Storage` - database failures and store timeouts
 * - `Session` - session store failures
 * - `Render` - page rendering failures
 * - `Hashing` - password hashing failures
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Persistence failures from the content store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// The operation did not finish within the configured bound
    #[error("store operation `{operation}` timed out")]
    Timeout { operation: &'static str },
}

impl StorageError {
    /// Whether the underlying database rejected a write on a UNIQUE constraint.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(err)) => err.is_unique_violation(),
            _ => false,
        }
    }
}

/// Session store failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session operation `{operation}` timed out")]
    Timeout { operation: &'static str },

    #[error("no session attached to the request")]
    Missing,
}

/// Page rendering failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("page `{page}` is missing required data: {field}")]
    MissingData {
        page: &'static str,
        field: &'static str,
    },

    #[error("template error: {0}")]
    Template(String),
}

/// Backend-specific error types
///
/// Every variant is a distinct tag so callers match structurally:
///
/// ```rust
/// use snippetbox::backend::error::BackendError;
///
/// fn message_for(err: &BackendError) -> Option<&'static str> {
///     match err {
///         BackendError::DuplicateEmail => Some("Address is already in use"),
///         BackendError::InvalidCredentials => Some("Email or Password is incorrect"),
///         _ => None,
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("not found")]
    NotFound,

    #[error("email address already in use")]
    DuplicateEmail,

    #[error("invalid user credentials")]
    InvalidCredentials,

    #[error("CSRF token missing or mismatched")]
    CsrfRejected,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl From<bcrypt::BcryptError> for BackendError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Hashing(err.to_string())
    }
}

impl BackendError {
    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `NotFound` - 404
    /// - `CsrfRejected` - 400
    /// - `DuplicateEmail` - 409
    /// - `InvalidCredentials` - 401
    /// - everything else - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::CsrfRejected => StatusCode::BAD_REQUEST,
            Self::DuplicateEmail => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Storage(_) | Self::Session(_) | Self::Render(_) | Self::Hashing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether this is a server-side fault rather than a domain outcome
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// The text sent to the client. Never contains internal detail.
    pub fn public_message(&self) -> &'static str {
        self.status_code()
            .canonical_reason()
            .unwrap_or("Internal Server Error")
    }
}
