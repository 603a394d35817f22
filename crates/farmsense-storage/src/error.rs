/// Errors that can occur within the storage layer.
///
/// # Examples
///
/// ```rust
/// use farmsense_storage::error::StorageError;
///
/// let err = StorageError::NotFound {
///     entity: "animal",
///     id: "42".to_string(),
/// };
/// assert!(err.to_string().contains("animal"));
/// assert!(err.is_not_found());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A required record was not found in the database.
    #[error("Storage: {entity} not found (id={id})")]
    NotFound { entity: &'static str, id: String },

    /// An underlying database error (connection, query or migration).
    #[error("Storage: database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Failure preparing the local data directory.
    #[error("Storage: I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic storage error for cases not covered by other variants.
    #[error("Storage: {0}")]
    Other(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// Convenience `Result` alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
