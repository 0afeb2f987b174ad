//! Storage error types for the texdocs database layer.
//!
//! Uniqueness-constraint failures are classified separately from every other
//! storage failure so managers can translate them into their own
//! "already exists" errors.

use thiserror::Error;

/// Errors that can occur while executing statements against the database.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A write violated a `UNIQUE` constraint.
    #[error("Uniqueness constraint violated: {reason}")]
    UniqueViolation {
        /// Message reported by the storage engine
        reason: String,
    },

    /// Any other failure reported by sqlx.
    #[error("SQL error: {reason}")]
    SqlxError {
        /// Context plus the underlying message
        reason: String,
        /// The underlying sqlx error, when there is one
        #[source]
        source: Option<sqlx::Error>,
    },

    /// A statement parameter could not be encoded.
    #[error("Failed to encode parameter {index}: {reason}")]
    EncodeFailed {
        /// Zero-based position of the parameter
        index: usize,
        /// Description of the encoding failure
        reason: String,
    },

    /// A structured column value could not be serialized.
    #[error("Serialization of column {column} failed")]
    SerializationFailed {
        /// Column the value was written to
        column: &'static str,
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// A structured column value could not be deserialized.
    #[error("Deserialization of column {column} failed")]
    DeserializationFailed {
        /// Column the value was read from
        column: &'static str,
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// The schema on disk needs a migration this build does not know.
    #[error("Unknown schema migration path: v{from} to v{to}")]
    UnknownMigration {
        /// Version found on disk
        from: i64,
        /// Version this build expects
        to: i64,
    },
}

impl DatabaseError {
    /// Check if this error is a uniqueness-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation { .. })
    }

    /// Check if this error is related to (de)serializing structured columns.
    pub fn is_serialization_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::SerializationFailed { .. } | DatabaseError::DeserializationFailed { .. }
        )
    }

    /// Classify a sqlx error, splitting out uniqueness violations.
    pub(crate) fn from_sqlx(context: &str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return DatabaseError::UniqueViolation {
                reason: format!("{context}: {}", db_err.message()),
            };
        }
        DatabaseError::SqlxError {
            reason: format!("{context}: {err}"),
            source: Some(err),
        }
    }
}

impl From<DatabaseError> for crate::Error {
    fn from(err: DatabaseError) -> Self {
        crate::Error::Database(err)
    }
}
