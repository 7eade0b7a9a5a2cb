//! Application-level utilities for the wiki CLI.
//!
//! This module provides:
//! - Application context for unified CLI + config handling
//! - Authorization header resolution from the encrypted vault

mod auth;
mod context;

pub use auth::authorization;
pub use context::AppContext;
