//! Account database entity for SeaORM.
//!
//! Mirrors `vinyl_store.accounts` as created by provisioning. The text
//! columns and `created_at` are nullable in that table.

use sea_orm::entity::prelude::*;

use common::AppError;
use domain::Account;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(schema_name = "vinyl_store", table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// `TIMESTAMP` without time zone, stored as UTC
    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for Account {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let created_at = model
            .created_at
            .ok_or_else(|| AppError::internal(format!("account {} has no created_at", model.id)))?;

        Ok(Account {
            id: Some(model.id),
            first_name: model.first_name.unwrap_or_default(),
            last_name: model.last_name.unwrap_or_default(),
            email: model.email.unwrap_or_default(),
            created_at: created_at.and_utc(),
        })
    }
}
