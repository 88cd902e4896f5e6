//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Storage-assigned identifier (None until persisted)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new, not yet persisted account stamped with the current UTC time.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }

    /// Check if storage has assigned an identifier
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Account creation data transfer object
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl CreateAccountRequest {
    /// Build a new in-memory account from the request.
    pub fn into_account(self) -> Account {
        Account::new(self.first_name, self.last_name, self.email)
    }
}

/// Account update data transfer object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UpdateAccountRequest {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_is_unpersisted() {
        let account = Account::new("Jane", "Doe", "jane@example.com");

        assert_eq!(account.id, None);
        assert!(!account.is_persisted());
        assert_eq!(account.first_name, "Jane");
        assert_eq!(account.last_name, "Doe");
        assert_eq!(account.email, "jane@example.com");
    }

    #[test]
    fn test_new_account_stamps_creation_time() {
        let before = Utc::now();
        let account = Account::new("Jane", "Doe", "jane@example.com");
        let after = Utc::now();

        assert!(account.created_at >= before);
        assert!(account.created_at <= after);
    }

    #[test]
    fn test_create_request_into_account() {
        let req: CreateAccountRequest = serde_json::from_str(
            r#"{"first_name":"Jane","last_name":"Doe","email":"jane@example.com"}"#,
        )
        .unwrap();

        let account = req.into_account();
        assert_eq!(account.first_name, "Jane");
        assert_eq!(account.email, "jane@example.com");
        assert!(!account.is_persisted());
    }

    #[test]
    fn test_create_request_requires_all_fields() {
        let result: Result<CreateAccountRequest, _> =
            serde_json::from_str(r#"{"first_name":"Jane","email":"jane@example.com"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_is_empty() {
        assert!(UpdateAccountRequest::default().is_empty());
        assert!(!UpdateAccountRequest {
            last_name: Some("Smith".to_string()),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_serialize_omits_missing_id() {
        let account = Account::new("Jane", "Doe", "jane@example.com");
        let json = serde_json::to_value(&account).unwrap();

        assert!(json.get("id").is_none());
        assert_eq!(json["first_name"], "Jane");
        assert!(json.get("created_at").is_some());
    }
}
