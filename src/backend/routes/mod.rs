//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs             - Module exports and documentation
//! ├── router.rs          - Main router creation and global pipeline
//! ├── snippet_routes.rs  - `/` and `/snippet/*`
//! └── user_routes.rs     - `/user/*`
//! ```
//!
//! # Routes
//!
//! | Method | Path | Gate |
//! |---|---|---|
//! | GET | `/` | |
//! | GET | `/snippet/{id}` | |
//! | GET, POST | `/snippet/new` | login |
//! | GET, POST | `/user/signup` | |
//! | GET, POST | `/user/login` | |
//! | POST | `/user/logout` | login |
//! | GET | `/static/*` | |
//!
//! Every POST is additionally checked by the CSRF stage of the global
//! pipeline.

/// Main router creation
pub mod router;

/// Snippet routes
pub mod snippet_routes;

/// User routes
pub mod user_routes;

pub use router::create_router;
