//! Account service - Handles account use cases on top of the repository.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppResult, OptionExt};
use domain::{Account, CreateAccountRequest, UpdateAccountRequest};

use crate::repository::AccountRepository;

/// Account service trait for dependency injection.
///
/// Lookups by identifier fail with `AppError::NotFound` when the account
/// does not exist.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Build and persist a new account
    async fn create_account(&self, request: CreateAccountRequest) -> AppResult<Account>;

    /// List all accounts
    async fn list_accounts(&self) -> AppResult<Vec<Account>>;

    /// Get account by ID
    async fn get_account(&self, id: i32) -> AppResult<Account>;

    /// Update account details
    async fn update_account(&self, id: i32, changes: UpdateAccountRequest) -> AppResult<Account>;

    /// Delete account
    async fn delete_account(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of AccountService using repository.
pub struct AccountManager {
    repo: Arc<dyn AccountRepository>,
}

impl AccountManager {
    /// Create new account service instance with repository
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn create_account(&self, request: CreateAccountRequest) -> AppResult<Account> {
        let account = request.into_account();
        self.repo.create(&account).await
    }

    async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        self.repo.list().await
    }

    async fn get_account(&self, id: i32) -> AppResult<Account> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn update_account(&self, id: i32, changes: UpdateAccountRequest) -> AppResult<Account> {
        // Nothing to write, but a missing id must still surface
        if changes.is_empty() {
            return self.get_account(id).await;
        }

        self.repo.update(id, changes).await
    }

    async fn delete_account(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use common::AppError;
    use mockall::predicate::eq;

    use super::*;
    use crate::repository::MockAccountRepository;

    fn stored_account(id: i32) -> Account {
        Account {
            id: Some(id),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    fn jane() -> CreateAccountRequest {
        CreateAccountRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_account_persists_new_account() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create()
            .withf(|a: &Account| {
                a.id.is_none()
                    && a.first_name == "Jane"
                    && a.last_name == "Doe"
                    && a.email == "jane@example.com"
            })
            .times(1)
            .returning(|a| {
                Ok(Account {
                    id: Some(1),
                    ..a.clone()
                })
            });

        let service = AccountManager::new(Arc::new(repo));
        let account = service.create_account(jane()).await.unwrap();

        assert_eq!(account.id, Some(1));
        assert_eq!(account.email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_create_account_propagates_storage_error() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create()
            .returning(|_| Err(AppError::internal("insert failed")));

        let service = AccountManager::new(Arc::new(repo));
        let result = service.create_account(jane()).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_list_accounts_empty() {
        let mut repo = MockAccountRepository::new();
        repo.expect_list().returning(|| Ok(vec![]));

        let service = AccountManager::new(Arc::new(repo));
        let accounts = service.list_accounts().await.unwrap();

        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn test_get_account_found() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(stored_account(id))));

        let service = AccountManager::new(Arc::new(repo));
        let account = service.get_account(3).await.unwrap();

        assert_eq!(account.id, Some(3));
    }

    #[tokio::test]
    async fn test_get_account_not_found() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = AccountManager::new(Arc::new(repo));
        let result = service.get_account(42).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_account_delegates_changes() {
        let mut repo = MockAccountRepository::new();
        repo.expect_update()
            .withf(|id, changes| *id == 3 && changes.email.as_deref() == Some("new@example.com"))
            .times(1)
            .returning(|id, changes| {
                let mut account = stored_account(id);
                account.email = changes.email.unwrap_or_default();
                Ok(account)
            });

        let service = AccountManager::new(Arc::new(repo));
        let changes = UpdateAccountRequest {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        let account = service.update_account(3, changes).await.unwrap();

        assert_eq!(account.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_empty_update_still_reports_missing_account() {
        let mut repo = MockAccountRepository::new();
        repo.expect_update().never();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = AccountManager::new(Arc::new(repo));
        let result = service
            .update_account(8, UpdateAccountRequest::default())
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_account_not_found() {
        let mut repo = MockAccountRepository::new();
        repo.expect_update().returning(|_, _| Err(AppError::NotFound));

        let service = AccountManager::new(Arc::new(repo));
        let changes = UpdateAccountRequest {
            first_name: Some("Janet".to_string()),
            ..Default::default()
        };
        let result = service.update_account(99, changes).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_account() {
        let mut repo = MockAccountRepository::new();
        repo.expect_delete().with(eq(5)).times(1).returning(|_| Ok(()));

        let service = AccountManager::new(Arc::new(repo));
        assert!(service.delete_account(5).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_account_not_found() {
        let mut repo = MockAccountRepository::new();
        repo.expect_delete().returning(|_| Err(AppError::NotFound));

        let service = AccountManager::new(Arc::new(repo));
        let result = service.delete_account(5).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
