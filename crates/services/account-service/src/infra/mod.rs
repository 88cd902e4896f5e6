//! Infrastructure layer - database connection and provisioning.

mod db;
mod provision;

pub use db::{connect_options, Database};
pub use provision::Provisioner;
