//! Middleware Module
//!
//! This module contains the request-processing stages of the server and the
//! [`Pipeline`] that puts them in order.
//!
//! # Architecture
//!
//! - **`pipeline`** - `Stage` enum and `Pipeline` (ordering as data)
//! - **`logging`** - one log event per request
//! - **`headers`** - security hardening headers
//! - **`session`** - session cookie to `Session` handle, cookie issuance
//! - **`csrf`** - double-submit CSRF check and `CsrfToken` extension
//! - **`auth`** - login gate for protected routes
//! - **`cookies`** - cookie parsing and `Set-Cookie` formatting
//!
//! # Realised Order
//!
//! ```text
//! request-log → security-headers → session-attach → csrf → [require-login] → handler
//! ```
//!
//! Stages that abort (csrf, require-login) still pass back through the
//! outer ones, so rejected responses are logged and carry the security
//! headers.

pub mod auth;
pub mod cookies;
pub mod csrf;
pub mod headers;
pub mod logging;
pub mod pipeline;
pub mod session;

pub use auth::require_login;
pub use csrf::CsrfToken;
pub use pipeline::{Pipeline, PipelineError, Stage};
