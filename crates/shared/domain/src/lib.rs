//! Domain layer - Core entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod account;
pub mod constants;

pub use account::{Account, CreateAccountRequest, UpdateAccountRequest};
pub use constants::*;
