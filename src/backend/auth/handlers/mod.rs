//! Authentication Handlers Module
//!
//! HTTP handlers for the user endpoints. Each handler validates its form,
//! calls the credential manager, and records the outcome in the session.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── signup.rs   - GET/POST /user/signup
//! ├── login.rs    - GET/POST /user/login
//! └── logout.rs   - POST /user/logout
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Signup**: form validated → user created → flash → 303 to `/user/login`
//! 2. **Login**: form validated → credentials verified → `currentUserID` set → 303 to `/snippet/new`
//! 3. **Logout**: `currentUserID` removed → flash → 303 to `/`

/// Signup handlers
pub mod signup;

/// Login handlers
pub mod login;

/// Logout handler
pub mod logout;

pub use login::{login, login_form};
pub use logout::logout;
pub use signup::{signup, signup_form};
