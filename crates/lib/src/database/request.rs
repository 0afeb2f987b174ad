//! Statement execution against the pool.
//!
//! Three primitives cover every manager operation: read at most one row,
//! read all rows, and write.

use sqlx::Arguments;
use sqlx::sqlite::{SqliteArguments, SqliteRow};

use std::fmt;

use super::{Database, DatabaseError, SqlValue, Statement};
use crate::{Error, Result};

/// Outcome of a write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostResult {
    /// Row id generated by the last insert on the connection
    pub last_insert_id: i64,
    /// Number of rows inserted, updated or deleted
    pub changes: u64,
}

impl PostResult {
    /// Fail with [`Error::InternalInconsistency`] when a write aimed at a row
    /// known to exist changed nothing.
    pub(crate) fn expect_changes(self, target: impl fmt::Display) -> Result<Self> {
        if self.changes == 0 {
            return Err(Error::vanished(target));
        }
        Ok(self)
    }
}

/// Encode parameters positionally, in order.
fn arguments<'q>(params: &[SqlValue]) -> Result<SqliteArguments<'q>> {
    let mut arguments = SqliteArguments::default();
    for (index, param) in params.iter().enumerate() {
        let added = match param {
            SqlValue::Integer(value) => arguments.add(*value),
            SqlValue::Text(value) => arguments.add(value.clone()),
            SqlValue::Bool(value) => arguments.add(*value),
            SqlValue::Null => arguments.add(Option::<i64>::None),
        };
        added.map_err(|e| DatabaseError::EncodeFailed {
            index,
            reason: e.to_string(),
        })?;
    }
    Ok(arguments)
}

impl Database {
    /// Execute a read and return the first row, if any.
    pub async fn get_one<T>(&self, statement: &Statement, params: &[SqlValue]) -> Result<Option<T>>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        tracing::trace!(sql = statement.sql(), "get_one");
        let row = sqlx::query_as_with::<_, T, _>(statement.sql(), arguments(params)?)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| DatabaseError::from_sqlx("Failed to read row", e))?;
        Ok(row)
    }

    /// Execute a read and return every matching row.
    pub async fn get_all<T>(&self, statement: &Statement, params: &[SqlValue]) -> Result<Vec<T>>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        tracing::trace!(sql = statement.sql(), "get_all");
        let rows = sqlx::query_as_with::<_, T, _>(statement.sql(), arguments(params)?)
            .fetch_all(self.pool())
            .await
            .map_err(|e| DatabaseError::from_sqlx("Failed to read rows", e))?;
        Ok(rows)
    }

    /// Execute an insert, update or delete.
    ///
    /// A `UNIQUE` constraint failure surfaces as [`DatabaseError::UniqueViolation`].
    pub async fn post(&self, statement: &Statement, params: &[SqlValue]) -> Result<PostResult> {
        tracing::trace!(sql = statement.sql(), "post");
        let result = sqlx::query_with(statement.sql(), arguments(params)?)
            .execute(self.pool())
            .await
            .map_err(|e| DatabaseError::from_sqlx("Failed to write", e))?;
        Ok(PostResult {
            last_insert_id: result.last_insert_rowid(),
            changes: result.rows_affected(),
        })
    }

    /// Evaluate an [`exists`](super::query::exists) statement.
    pub async fn get_exists(&self, statement: &Statement, params: &[SqlValue]) -> Result<bool> {
        let row: Option<(bool,)> = self.get_one(statement, params).await?;
        Ok(matches!(row, Some((true,))))
    }
}
