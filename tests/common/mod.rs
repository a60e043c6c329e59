//! Common test utilities and helpers
//!
//! This module provides shared utilities for the integration tests:
//! - An in-memory application driven by a manual clock
//! - A cookie-keeping test client built on `tower::ServiceExt::oneshot`
//! - Helpers for signing up and logging in

#![allow(dead_code)]

pub mod app;
pub mod client;

pub use app::*;
