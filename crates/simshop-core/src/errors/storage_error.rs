//! Storage-layer errors for SQLite operations.

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("Duplicate value for {field}")]
    Duplicate { field: String },

    #[error("Referenced record is missing or still in use: {message}")]
    Reference { message: String },

    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },
}
