//! Common utilities shared across services.
//!
//! This crate provides:
//! - Unified error handling with structured database error classification
//! - Connection configuration

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, DbErrorKind, OptionExt};
