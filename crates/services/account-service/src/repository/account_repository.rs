//! Account repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, DbErr, EntityTrait, Set};

use super::entities::account::{ActiveModel, Entity as AccountEntity};
use common::{AppError, AppResult};
use domain::{Account, UpdateAccountRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account; storage assigns the identifier
    async fn create(&self, account: &Account) -> AppResult<Account>;

    /// Find account by ID (`None` when absent)
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Account>>;

    /// List every account in storage order
    async fn list(&self) -> AppResult<Vec<Account>>;

    /// Apply field changes to an existing account
    async fn update(&self, id: i32, changes: UpdateAccountRequest) -> AppResult<Account>;

    /// Delete account by ID
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of AccountRepository
pub struct AccountStore {
    db: Arc<DatabaseConnection>,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn create(&self, account: &Account) -> AppResult<Account> {
        let active_model = ActiveModel {
            id: NotSet,
            first_name: Set(Some(account.first_name.clone())),
            last_name: Set(Some(account.last_name.clone())),
            email: Set(Some(account.email.clone())),
            created_at: Set(Some(account.created_at.naive_utc())),
        };

        let model = active_model.insert(self.db.as_ref()).await.map_err(AppError::from)?;
        Account::try_from(model)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Account>> {
        AccountEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?
            .map(Account::try_from)
            .transpose()
    }

    async fn list(&self) -> AppResult<Vec<Account>> {
        let models = AccountEntity::find()
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(Account::try_from).collect()
    }

    async fn update(&self, id: i32, changes: UpdateAccountRequest) -> AppResult<Account> {
        let account = AccountEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AppError::NotFound)?;

        if changes.is_empty() {
            return Account::try_from(account);
        }

        let mut active: ActiveModel = account.into();

        if let Some(first_name) = changes.first_name {
            active.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(Some(last_name));
        }
        if let Some(email) = changes.email {
            active.email = Set(Some(email));
        }

        // Row removed between the lookup and the write
        let model = active
            .update(self.db.as_ref())
            .await
            .map_err(|err| match err {
                DbErr::RecordNotUpdated => AppError::NotFound,
                other => AppError::from(other),
            })?;
        Account::try_from(model)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = AccountEntity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
