//! Domain-level constants.
//!
//! Names of the persisted objects. Existing deployments depend on these
//! exact values.

// =============================================================================
// Storage layout
// =============================================================================

/// Application database created during provisioning
pub const DATABASE_NAME: &str = "vinyl_store_storage";

/// Schema holding the application tables
pub const SCHEMA_NAME: &str = "vinyl_store";

/// Accounts table inside [`SCHEMA_NAME`]
pub const ACCOUNTS_TABLE: &str = "accounts";

/// Restricted login role used for all CRUD traffic
pub const APP_ROLE: &str = "vinyl_user";

/// Maximum length of the text columns (`VARCHAR(255)`)
pub const MAX_TEXT_LENGTH: u32 = 255;
