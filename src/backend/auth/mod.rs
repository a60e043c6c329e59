//! Authentication Module
//!
//! This module handles user registration, login and server-side sessions.
//!
//! # Architecture
//!
//! - **`credentials`** - `CredentialManager`: bcrypt hashing and verification
//! - **`sessions`** - `SessionManager`: token-keyed session values with flash
//! - **`handlers`** - HTTP handlers for the `/user/*` endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── credentials.rs  - Credential manager
//! ├── sessions.rs     - Session manager and Session handle
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage
//! - Session tokens are random and never chosen by the client
//! - Invalid credentials are reported the same way whether or not the email
//!   exists
//! - An authenticated session is one holding `currentUserID`

/// Password hashing and verification
pub mod credentials;

/// Server-side sessions
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use credentials::CredentialManager;
pub use handlers::{login, login_form, logout, signup, signup_form};
pub use sessions::{Session, SessionManager, SessionValue, CURRENT_USER_KEY, FLASH_KEY};
