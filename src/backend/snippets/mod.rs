//! Snippet Module
//!
//! HTTP handlers for listing, viewing and creating snippets. Storage lives
//! in [`crate::backend::store`]; this module only orchestrates validation,
//! storage, flash messages and rendering.
//!
//! # Handlers
//!
//! - **`home`** - GET / - latest live snippets
//! - **`show_snippet`** - GET /snippet/{id}
//! - **`new_snippet_form`** - GET /snippet/new (login required)
//! - **`create_snippet`** - POST /snippet/new (login required)

pub mod handlers;

pub use handlers::{create_snippet, home, new_snippet_form, show_snippet};
