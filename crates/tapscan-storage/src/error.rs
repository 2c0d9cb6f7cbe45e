use thiserror::Error;

/// Storage-specific error types.
///
/// Covers the SQLite-backed note book and the secure slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection or query execution failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration execution failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input rejected before touching storage
    #[error("Validation error: {0}")]
    Validation(String),

    /// The authenticator refused or failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Secure slot used before a successful unlock
    #[error("Secure storage is locked")]
    Locked,

    /// Secret vault backend failure
    #[error("Vault error: {0}")]
    Vault(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
