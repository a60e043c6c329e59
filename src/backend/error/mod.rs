//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are used in HTTP handlers and middleware and can be
//! converted to HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # Propagation
//!
//! - Validation failures never become errors; they stay on the form and the
//!   page is re-rendered.
//! - Domain errors (`NotFound`, `DuplicateEmail`, `InvalidCredentials`) are
//!   matched locally by handlers and turned into user-facing messages.
//! - Everything else is logged in full and answered with a generic 500.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{BackendError, RenderError, SessionError, StorageError};
