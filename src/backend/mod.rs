//! Backend Module
//!
//! This module contains all server-side code for Snippetbox.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`middleware`** - The request pipeline and its stages
//! - **`auth`** - Credentials, sessions and the `/user/*` handlers
//! - **`snippets`** - Snippet handlers
//! - **`store`** - SQLite persistence for snippets and users
//! - **`render`** - Renderer trait and the built-in HTML renderer
//! - **`error`** - Backend error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Binary entry point
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── middleware/     - Pipeline and stages
//! ├── auth/           - Credentials, sessions, user handlers
//! ├── snippets/       - Snippet handlers
//! ├── store/          - Content store
//! ├── render/         - Page rendering
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! ```text
//! request-log → security-headers → session-attach → csrf → [require-login]
//!     → handler → form validation → credential manager / content store
//!     → session (flash, currentUserID) → renderer
//! ```
//!
//! # State Management
//!
//! Handlers and stateful stages receive an explicit [`AppState`]. Sessions
//! live in memory behind an `Arc<RwLock<..>>`; snippets and users live in
//! SQLite behind a `sqlx` pool.
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`. Validation failures never
//! become errors; domain outcomes are matched locally; everything else is
//! logged and answered with a generic 500.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Middleware pipeline and stages
pub mod middleware;

/// Authentication and sessions
pub mod auth;

/// Snippet handlers
pub mod snippets;

/// Content store
pub mod store;

/// Page rendering
pub mod render;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::{create_app, AppState};
