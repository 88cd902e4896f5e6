//! Unified error handling.
//!
//! Driver errors are carried unmodified inside [`AppError::Database`] and can
//! be classified through [`DbErrorKind`] using the SQLSTATE code the driver
//! reports, instead of matching on message text.

use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Classification of the underlying database error, if any.
    pub fn db_kind(&self) -> Option<DbErrorKind> {
        match self {
            #[cfg(feature = "database")]
            AppError::Database(err) => Some(DbErrorKind::classify(err)),
            _ => None,
        }
    }

    /// True when a provisioning step hit an object that already exists.
    pub fn is_duplicate_object(&self) -> bool {
        self.db_kind().is_some_and(DbErrorKind::is_duplicate_object)
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

// =============================================================================
// Database error classification
// =============================================================================

/// PostgreSQL SQLSTATE codes the services care about.
pub mod sqlstate {
    pub const DUPLICATE_DATABASE: &str = "42P04";
    pub const DUPLICATE_OBJECT: &str = "42710";
    pub const DUPLICATE_SCHEMA: &str = "42P06";
    pub const DUPLICATE_TABLE: &str = "42P07";
    pub const UNIQUE_VIOLATION: &str = "23505";
    /// Class 23: integrity constraint violation
    pub const INTEGRITY_CONSTRAINT_CLASS: &str = "23";
}

/// Structured kind of a database failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    /// Could not open, acquire or ping a connection
    Connection,
    DuplicateDatabase,
    /// Duplicate role or other named object
    DuplicateObject,
    DuplicateSchema,
    DuplicateTable,
    UniqueViolation,
    ConstraintViolation,
    Other,
}

impl DbErrorKind {
    /// Map a SQLSTATE code to a kind.
    pub fn from_sqlstate(code: &str) -> Self {
        match code {
            sqlstate::DUPLICATE_DATABASE => DbErrorKind::DuplicateDatabase,
            sqlstate::DUPLICATE_OBJECT => DbErrorKind::DuplicateObject,
            sqlstate::DUPLICATE_SCHEMA => DbErrorKind::DuplicateSchema,
            sqlstate::DUPLICATE_TABLE => DbErrorKind::DuplicateTable,
            sqlstate::UNIQUE_VIOLATION => DbErrorKind::UniqueViolation,
            c if c.starts_with(sqlstate::INTEGRITY_CONSTRAINT_CLASS) => {
                DbErrorKind::ConstraintViolation
            }
            _ => DbErrorKind::Other,
        }
    }

    /// Duplicate-object conditions are recoverable during provisioning.
    pub fn is_duplicate_object(self) -> bool {
        matches!(
            self,
            DbErrorKind::DuplicateDatabase
                | DbErrorKind::DuplicateObject
                | DbErrorKind::DuplicateSchema
                | DbErrorKind::DuplicateTable
        )
    }

    /// Classify a SeaORM error.
    #[cfg(feature = "database")]
    pub fn classify(err: &sea_orm::DbErr) -> Self {
        use sea_orm::DbErr;

        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => DbErrorKind::Connection,
            _ => sqlstate_of(err)
                .map(|code| DbErrorKind::from_sqlstate(&code))
                .unwrap_or(DbErrorKind::Other),
        }
    }
}

/// Extract the SQLSTATE code reported by the server, if the error carries one.
#[cfg(feature = "database")]
fn sqlstate_of(err: &sea_orm::DbErr) -> Option<String> {
    use sea_orm::{DbErr, RuntimeErr};

    let runtime = match err {
        DbErr::Exec(e) | DbErr::Query(e) => e,
        _ => return None,
    };

    match runtime {
        RuntimeErr::SqlxError(sqlx_err) => sqlx_err
            .as_database_error()
            .and_then(|db_err| db_err.code())
            .map(|code| code.into_owned()),
        _ => None,
    }
}
