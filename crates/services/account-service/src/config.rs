//! Account service configuration.

use std::env;

use common::{ConnectionConfig, DatabaseConfig};
use domain::{APP_ROLE, DATABASE_NAME};

/// Account service configuration.
#[derive(Clone)]
pub struct AccountServiceConfig {
    /// Administrative identity used only while provisioning
    pub admin: ConnectionConfig,
    /// Password given to the restricted application role
    app_password: String,
    /// Pool sizing shared by both identities
    pub pool: DatabaseConfig,
}

impl std::fmt::Debug for AccountServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountServiceConfig")
            .field("admin", &self.admin)
            .field("app_password", &"[REDACTED]")
            .field("pool", &self.pool)
            .finish()
    }
}

impl AccountServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let admin = ConnectionConfig {
            host: lookup("ACCOUNT_DB_HOST").unwrap_or(defaults.admin.host),
            port: lookup("ACCOUNT_DB_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.admin.port),
            user: lookup("ACCOUNT_ADMIN_USER").unwrap_or(defaults.admin.user),
            password: lookup("ACCOUNT_ADMIN_PASSWORD").unwrap_or(defaults.admin.password),
            database: lookup("ACCOUNT_ADMIN_DATABASE").unwrap_or(defaults.admin.database),
            ssl_mode: lookup("ACCOUNT_DB_SSLMODE").unwrap_or(defaults.admin.ssl_mode),
        };

        let pool = DatabaseConfig {
            max_connections: lookup("ACCOUNT_DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.pool.max_connections),
            ..defaults.pool
        };

        Self {
            admin,
            app_password: lookup("ACCOUNT_APP_PASSWORD").unwrap_or(defaults.app_password),
            pool,
        }
    }

    /// Administrative identity pointed at the application database.
    pub fn admin_on_app_database(&self) -> ConnectionConfig {
        self.admin.with_database(DATABASE_NAME)
    }

    /// Restricted role identity on the application database.
    pub fn app_connection(&self) -> ConnectionConfig {
        self.admin.with_identity(APP_ROLE, self.app_password.clone(), DATABASE_NAME)
    }

    /// Password for `CREATE ROLE`.
    pub fn app_password(&self) -> &str {
        &self.app_password
    }
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            admin: ConnectionConfig {
                password: "mysecretpassword".to_string(),
                ..Default::default()
            },
            app_password: "mysecretpassword".to_string(),
            pool: DatabaseConfig::default(),
        }
    }
}
