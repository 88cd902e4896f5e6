//! First-run provisioning of the account storage.
//!
//! Brings a fresh PostgreSQL cluster to the state the account store expects:
//! application database, restricted login role, schema, grants and the
//! accounts table. Every step is safe to re-run. Steps run strictly in order
//! and there is no rollback: a failure part way leaves earlier objects in
//! place, and re-running picks up from there.

use sea_orm::sea_query::{Alias, ColumnDef, Expr, Table, TableCreateStatement};
use sea_orm::{ConnectionTrait, DbErr, ExecResult};
use tracing::info;

use common::{AppError, AppResult};
use domain::{ACCOUNTS_TABLE, APP_ROLE, DATABASE_NAME, MAX_TEXT_LENGTH, SCHEMA_NAME};

use super::Database;
use crate::config::AccountServiceConfig;
use crate::repository::entities::account;

/// Runs the provisioning sequence.
pub struct Provisioner {
    config: AccountServiceConfig,
}

impl Provisioner {
    pub fn new(config: AccountServiceConfig) -> Self {
        Self { config }
    }

    /// Provision everything and return a connection authenticated as the
    /// restricted application role.
    pub async fn run(&self) -> AppResult<Database> {
        let admin = Database::connect(&self.config.admin, &self.config.pool).await?;
        let admin = self.create_database(admin).await?;

        self.create_role(&admin).await?;
        self.create_schema(&admin).await?;
        self.grant_permissions(&admin).await?;

        admin.close().await?;
        let app = Database::connect(&self.config.app_connection(), &self.config.pool).await?;
        info!(role = APP_ROLE, "Reconnected as application role");

        self.create_account_table(&app).await?;
        app.ping().await?;

        info!("Provisioning complete");
        Ok(app)
    }

    /// Create the application database, then move the admin connection onto it.
    async fn create_database(&self, admin: Database) -> AppResult<Database> {
        let result = admin.connection().execute_unprepared(&create_database_sql()).await;
        tolerate_duplicate(result, DATABASE_NAME)?;

        admin.close().await?;
        let admin =
            Database::connect(&self.config.admin_on_app_database(), &self.config.pool).await?;
        admin.ping().await?;

        info!(database = DATABASE_NAME, "Database ready");
        Ok(admin)
    }

    async fn create_role(&self, admin: &Database) -> AppResult<()> {
        let result = admin
            .connection()
            .execute_unprepared(&create_role_sql(self.config.app_password()))
            .await;
        tolerate_duplicate(result, APP_ROLE)?;

        info!(role = APP_ROLE, "Role ready");
        Ok(())
    }

    async fn create_schema(&self, admin: &Database) -> AppResult<()> {
        admin
            .connection()
            .execute_unprepared(&create_schema_sql())
            .await?;

        info!(schema = SCHEMA_NAME, "Schema ready");
        Ok(())
    }

    async fn grant_permissions(&self, admin: &Database) -> AppResult<()> {
        for statement in grant_statements() {
            admin.connection().execute_unprepared(&statement).await?;
        }

        info!(role = APP_ROLE, schema = SCHEMA_NAME, "Privileges granted");
        Ok(())
    }

    async fn create_account_table(&self, app: &Database) -> AppResult<()> {
        let conn = app.connection();
        let backend = conn.get_database_backend();
        conn.execute(backend.build(&account_table_statement())).await?;

        info!(table = ACCOUNTS_TABLE, "Table ready");
        Ok(())
    }
}

/// Treat a duplicate-object failure as success; anything else propagates.
fn tolerate_duplicate(result: Result<ExecResult, DbErr>, object: &str) -> AppResult<()> {
    match result.map_err(AppError::from) {
        Ok(_) => Ok(()),
        Err(err) if err.is_duplicate_object() => {
            info!(object, "Already exists, skipping");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

// =============================================================================
// SQL
// =============================================================================

pub(crate) fn create_database_sql() -> String {
    format!("CREATE DATABASE {}", DATABASE_NAME)
}

pub(crate) fn create_role_sql(password: &str) -> String {
    format!(
        "CREATE ROLE {} WITH LOGIN PASSWORD '{}'",
        APP_ROLE,
        password.replace('\'', "''")
    )
}

pub(crate) fn create_schema_sql() -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", SCHEMA_NAME)
}

/// Grants for the application role, in execution order. The final default
/// privileges rule covers tables created later.
pub(crate) fn grant_statements() -> Vec<String> {
    vec![
        format!("GRANT CONNECT ON DATABASE {DATABASE_NAME} TO {APP_ROLE}"),
        format!("GRANT CREATE ON DATABASE {DATABASE_NAME} TO {APP_ROLE}"),
        format!("GRANT USAGE ON SCHEMA {SCHEMA_NAME} TO {APP_ROLE}"),
        format!("GRANT CREATE ON SCHEMA {SCHEMA_NAME} TO {APP_ROLE}"),
        format!(
            "GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA {SCHEMA_NAME} TO {APP_ROLE}"
        ),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA {SCHEMA_NAME} GRANT SELECT, INSERT, UPDATE, DELETE ON TABLES TO {APP_ROLE}"
        ),
    ]
}

/// `CREATE TABLE IF NOT EXISTS vinyl_store.accounts (...)`
pub(crate) fn account_table_statement() -> TableCreateStatement {
    Table::create()
        .table((Alias::new(SCHEMA_NAME), Alias::new(ACCOUNTS_TABLE)))
        .if_not_exists()
        .col(
            ColumnDef::new(account::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(account::Column::FirstName).string_len(MAX_TEXT_LENGTH))
        .col(ColumnDef::new(account::Column::LastName).string_len(MAX_TEXT_LENGTH))
        .col(ColumnDef::new(account::Column::Email).string_len(MAX_TEXT_LENGTH))
        .col(
            ColumnDef::new(account::Column::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}
