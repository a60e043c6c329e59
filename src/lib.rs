//! Snippetbox - Main Library
//!
//! Snippetbox is a small authenticated publishing service: users sign up,
//! log in, and publish text snippets that stay publicly visible until they
//! expire.
//!
//! # Module Structure
//!
//! - **`shared`** - Types that do not depend on the HTTP server
//!   - Snippet and user models, expiry durations
//!   - Form validators and their failure maps
//!   - Application configuration
//!
//! - **`backend`** - The Axum server
//!   - Middleware pipeline (logging, security headers, sessions, CSRF, login gate)
//!   - Session manager with one-time flash messages
//!   - Credential manager (bcrypt)
//!   - SQLite content store with expiry-windowed visibility
//!   - Request handlers and page rendering
//!
//! # Usage
//!
//! ```rust,no_run
//! use snippetbox::backend::server::{config::load_config, create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(load_config()?).await?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:4000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types (models, forms, configuration)
pub mod shared;

/// Server-side code
pub mod backend;
