//! Error types for the driver layer.

use thiserror::Error;

/// Comprehensive error type for all driver operations.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Connection-level errors: I/O failure, malformed SQL, constraint
    /// violation, wrong key/cipher
    #[error("Database error: {message}")]
    Connection {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// A cursor accessor was called with no current row
    #[error("Cursor has no current row")]
    NoRow,
    /// The stored schema version is newer than the configured schema
    #[error("Database version {stored} newer than configured schema version {configured}")]
    VersionSkew { stored: i64, configured: i64 },
    /// A transaction was ended out of LIFO order
    #[error("Transaction ended out of order; the innermost open transaction must end first")]
    TransactionDiscipline,
    /// A transaction body failed and the rollback issued on its behalf
    /// failed as well; both causes are preserved for diagnosis
    #[error("Transaction failed ({source}) and rollback also failed ({rollback})")]
    RollbackFailure {
        #[source]
        source: Box<DriverError>,
        rollback: Box<DriverError>,
    },
    /// A caller-supplied schema callback reported a failure of its own
    #[error("Schema callback failed: {message}")]
    Schema { message: String },
}

impl DriverError {
    /// Creates a connection error with additional context.
    pub fn connection(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Connection {
            message: message.into(),
            source,
        }
    }

    /// Creates a schema callback error, for use inside `create`/`upgrade`
    /// hooks.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}

/// Extension trait for Results carrying a `rusqlite::Error`, providing
/// concise mapping into [`DriverError::Connection`].
pub trait ConnectionResultExt<T> {
    /// Map connection errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> ConnectionResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| DriverError::connection(message, e))
    }
}

/// Result type alias for driver operations
pub type Result<T> = std::result::Result<T, DriverError>;
