//! Database connection handle.

use std::str::FromStr;
use std::sync::Arc;

use sea_orm::sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, RuntimeErr, SqlxPostgresConnector, Statement,
};

use common::{AppError, AppResult, ConnectionConfig, DatabaseConfig};

/// Database wrapper for connection management
pub struct Database {
    connection: Arc<DatabaseConnection>,
}

impl Database {
    /// Open a connection pool for the given identity.
    pub async fn connect(config: &ConnectionConfig, pool: &DatabaseConfig) -> AppResult<Self> {
        let options = connect_options(config)?;

        let pg_pool = PgPoolOptions::new()
            .max_connections(pool.max_connections)
            .min_connections(pool.min_connections)
            .connect_with(options)
            .await
            .map_err(|e| DbErr::Conn(RuntimeErr::SqlxError(e)))?;

        tracing::debug!(user = %config.user, database = %config.database, "Database connected");

        Ok(Self {
            connection: Arc::new(SqlxPostgresConnector::from_sqlx_postgres_pool(pg_pool)),
        })
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        self.connection.as_ref()
    }

    /// Get a shared handle to the database connection.
    pub fn shared_connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.connection)
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> AppResult<()> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }

    /// Close every pooled connection. Handles from
    /// [`Database::shared_connection`] must be dropped first.
    pub async fn close(self) -> AppResult<()> {
        let connection = Arc::try_unwrap(self.connection)
            .map_err(|_| AppError::internal("database connection is still in use"))?;
        connection.close().await?;
        Ok(())
    }
}

/// Translate a [`ConnectionConfig`] into driver options.
pub fn connect_options(config: &ConnectionConfig) -> AppResult<PgConnectOptions> {
    let ssl_mode = PgSslMode::from_str(&config.ssl_mode)
        .map_err(|_| AppError::validation(format!("Unknown SSL mode: {}", config.ssl_mode)))?;

    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database)
        .ssl_mode(ssl_mode))
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn mock_database() -> Database {
        Database {
            connection: Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
        }
    }

    #[tokio::test]
    async fn test_close_refuses_while_connection_is_shared() {
        let db = mock_database();
        let _store_handle = db.shared_connection();

        let err = db.close().await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_close_after_shared_handles_dropped() {
        let db = mock_database();
        let handle = db.shared_connection();
        assert!(std::ptr::eq(handle.as_ref(), db.connection()));
        drop(handle);

        assert!(db.close().await.is_ok());
    }

    #[test]
    fn test_connect_options_accepts_libpq_ssl_modes() {
        for mode in ["disable", "allow", "prefer", "require", "verify-ca", "verify-full"] {
            let config = ConnectionConfig {
                ssl_mode: mode.to_string(),
                ..Default::default()
            };
            assert!(connect_options(&config).is_ok(), "mode {mode} rejected");
        }
    }

    #[test]
    fn test_connect_options_rejects_unknown_ssl_mode() {
        let config = ConnectionConfig {
            ssl_mode: "sometimes".to_string(),
            ..Default::default()
        };

        let err = connect_options(&config).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_connect_options_carries_identity() {
        let config = ConnectionConfig {
            host: "db.internal".to_string(),
            port: 6543,
            user: "vinyl_user".to_string(),
            database: "vinyl_store_storage".to_string(),
            ..Default::default()
        };

        let options = connect_options(&config).unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "vinyl_user");
        assert_eq!(options.get_database(), Some("vinyl_store_storage"));
    }
}
