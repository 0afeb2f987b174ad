//! Parameterized SQL statement construction.
//!
//! Every statement produced here uses positional `?` placeholders; values are
//! never interpolated into the SQL text. Table and column names come from
//! constants in the manager modules, not from callers.

use std::fmt;

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Text(String),
    Bool(bool),
    Null,
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// A selected column, optionally exposed under a different output name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    name: &'static str,
    alias: Option<&'static str>,
}

impl Column {
    /// Select a column under its storage name.
    pub const fn new(name: &'static str) -> Self {
        Self { name, alias: None }
    }

    /// Select `name` and expose it as `alias`.
    pub const fn aliased(name: &'static str, alias: &'static str) -> Self {
        Self {
            name,
            alias: Some(alias),
        }
    }

    fn render(&self) -> String {
        match self.alias {
            Some(alias) => format!("{} AS {}", self.name, alias),
            None => self.name.to_string(),
        }
    }
}

impl From<&'static str> for Column {
    fn from(name: &'static str) -> Self {
        Column::new(name)
    }
}

/// A finished SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: String,
}

impl Statement {
    /// The SQL text with `?` placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Optional clauses of a select statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectOptions {
    /// Filter rows with `column = ?`
    pub where_column: Option<&'static str>,
    /// Sort the result ascending by this column
    pub order_by: Option<&'static str>,
}

impl SelectOptions {
    /// Filter by equality on `column`.
    pub const fn filter(column: &'static str) -> Self {
        Self {
            where_column: Some(column),
            order_by: None,
        }
    }

    /// Additionally sort by `column`.
    pub const fn order_by(mut self, column: &'static str) -> Self {
        self.order_by = Some(column);
        self
    }
}

/// `SELECT columns FROM table [WHERE where_column = ?] [ORDER BY order_by]`
pub fn select(table: &str, columns: &[Column], options: SelectOptions) -> Statement {
    let columns = columns
        .iter()
        .map(Column::render)
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!("SELECT {columns} FROM {table}");
    if let Some(column) = options.where_column {
        sql.push_str(&format!(" WHERE {column} = ?"));
    }
    if let Some(column) = options.order_by {
        sql.push_str(&format!(" ORDER BY {column}"));
    }
    Statement { sql }
}

/// `INSERT INTO table (columns) VALUES (?, ...)`
pub fn insert(table: &str, columns: &[&str]) -> Statement {
    let placeholders = vec!["?"; columns.len()].join(", ");
    Statement {
        sql: format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            columns.join(", ")
        ),
    }
}

/// `UPDATE table SET column = ?, ... WHERE key = ?`
///
/// The key value is bound after the assigned values.
pub fn update(table: &str, columns: &[&str], key: &str) -> Statement {
    let assignments = columns
        .iter()
        .map(|column| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    Statement {
        sql: format!("UPDATE {table} SET {assignments} WHERE {key} = ?"),
    }
}

/// `DELETE FROM table WHERE key = ?`
pub fn remove(table: &str, key: &str) -> Statement {
    Statement {
        sql: format!("DELETE FROM {table} WHERE {key} = ?"),
    }
}

/// Name of the single column returned by [`exists`].
pub const EXISTS_COLUMN: &str = "exists_value";

/// `SELECT EXISTS(SELECT 1 FROM table WHERE column = ?) AS exists_value`
pub fn exists(table: &str, column: &str) -> Statement {
    Statement {
        sql: format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE {column} = ?) AS {EXISTS_COLUMN}"
        ),
    }
}

/// `SELECT EXISTS(SELECT 1 FROM table WHERE a = ? AND b = ? ...) AS exists_value`
pub fn exists_all(table: &str, columns: &[&str]) -> Statement {
    let conditions = columns
        .iter()
        .map(|column| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(" AND ");
    Statement {
        sql: format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE {conditions}) AS {EXISTS_COLUMN}"
        ),
    }
}

/// Ordered column/value pairs for inserts and partial updates.
///
/// Fields are appended in the order the caller sets them; absent optional
/// values are skipped, so an update only touches the fields present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: Vec<(&'static str, SqlValue)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always include `column`.
    pub fn set(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.fields.push((column, value.into()));
        self
    }

    /// Include `column` only when `value` is present.
    pub fn set_if<T: Into<SqlValue>>(self, column: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(column, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(column, _)| *column).collect()
    }

    /// Build the insert statement and its parameters.
    pub fn into_insert(self, table: &str) -> (Statement, Vec<SqlValue>) {
        let statement = insert(table, &self.columns());
        let params = self.fields.into_iter().map(|(_, value)| value).collect();
        (statement, params)
    }

    /// Build the update statement and its parameters, key value last.
    pub fn into_update(
        self,
        table: &str,
        key: &str,
        key_value: impl Into<SqlValue>,
    ) -> (Statement, Vec<SqlValue>) {
        let statement = update(table, &self.columns(), key);
        let mut params: Vec<SqlValue> = self.fields.into_iter().map(|(_, value)| value).collect();
        params.push(key_value.into());
        (statement, params)
    }
}
