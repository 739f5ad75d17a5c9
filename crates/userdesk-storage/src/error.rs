use sea_orm::{DbErr, SqlErr};

/// Errors that can occur within the storage layer.
///
/// Handlers map each variant onto an HTTP status: validation and constraint
/// failures are client errors, `NotFound` is a 404 and `Database` is an
/// unexpected server-side fault.
///
/// # Examples
///
/// ```rust
/// use userdesk_storage::error::StorageError;
///
/// let err = StorageError::NotFound {
///     entity: "user",
///     id: "42".to_string(),
/// };
/// assert!(err.to_string().contains("user"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A field failed validation before reaching the database.
    #[error("{0}")]
    Validation(String),

    /// The database rejected the write because of a uniqueness rule. The
    /// message is the one reported by the database.
    #[error("{0}")]
    Constraint(String),

    /// A required record was not found in the database.
    #[error("Storage: {entity} not found (id={id})")]
    NotFound { entity: &'static str, id: String },

    /// Any other database failure (connectivity, I/O, malformed rows).
    #[error("Storage: database error: {0}")]
    Database(DbErr),
}

impl StorageError {
    /// Returns `true` for failures caused by the request content rather than
    /// the storage backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Constraint(_))
    }
}

impl From<DbErr> for StorageError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::Constraint(msg),
            _ => Self::Database(err),
        }
    }
}

/// Convenience `Result` alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
