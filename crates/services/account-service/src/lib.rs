//! Account Service Library
//!
//! Persistence for accounts in PostgreSQL: first-run provisioning of the
//! database, role, schema and table, plus the account CRUD contract.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use common::AppResult;
use tracing::info;

use crate::config::AccountServiceConfig;
use crate::infra::{Database, Provisioner};
use crate::repository::AccountStore;
use crate::service::AccountManager;

/// Run provisioning and return a connection as the application role.
pub async fn provision(config: &AccountServiceConfig) -> AppResult<Database> {
    info!("Provisioning account storage");
    Provisioner::new(config.clone()).run().await
}

/// Connect as the application role to already provisioned storage.
pub async fn connect(config: &AccountServiceConfig) -> AppResult<Database> {
    let db = Database::connect(&config.app_connection(), &config.pool).await?;
    db.ping().await?;
    Ok(db)
}

/// Wire the store and service over an open connection.
pub fn account_service(db: &Database) -> AccountManager {
    let store = Arc::new(AccountStore::new(db.shared_connection()));
    AccountManager::new(store)
}
