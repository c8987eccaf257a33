//! Core types for the Postbox letterbox controller.
//!
//! This crate holds the credential and identity types shared by the rest of
//! the workspace, the controller-wide constants, and the common error type.
//! It is deliberately free of hardware and runtime concerns so that every
//! other crate can depend on it.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
