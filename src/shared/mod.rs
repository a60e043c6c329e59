//! Shared Module
//!
//! This module contains types and data structures that do not depend on the
//! HTTP server: the snippet and user models, the form validators and the
//! application configuration.
//!
//! # Overview
//!
//! Everything in here is plain data plus pure functions. The backend builds
//! on these types, and tests can exercise them without a database or runtime.

/// Snippet and user data models
pub mod models;

/// Form values and validation rules
pub mod forms;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use models::{Expiry, Snippet, SnippetId, UserId};
pub use forms::{Failures, LoginForm, NewSnippetForm, SignupForm};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
