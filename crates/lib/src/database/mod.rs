//! SQLite storage for texdocs.
//!
//! This module provides the [`Database`] handle every manager function takes,
//! the statement builder in [`query`], the request primitives
//! ([`Database::get_one`], [`Database::get_all`], [`Database::post`]) and the
//! code-defined schema in [`schema`].
//!
//! ## Architecture
//!
//! The handle wraps a sqlx `SqlitePool` over a single database file. Each
//! manager operation issues sequential statements (existence check,
//! authorisation, mutation) without wrapping them in a transaction, so
//! consistency relies on SQLite's per-statement locking.

mod errors;
mod request;

/// Parameterized statement builder.
pub mod query;
/// Schema definition and migration system.
pub mod schema;

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::Result;

pub use errors::DatabaseError;
pub use query::{Column, FieldSet, SelectOptions, SqlValue, Statement};
pub use request::PostResult;

/// Default file name used when no path is configured.
pub const DEFAULT_DATABASE_FILE: &str = "texdocs.db";

/// Which ownership checks the group and document managers apply.
///
/// The account manager always authorises mutations. Group `get`/`remove`
/// and document `update`/`remove` historically skipped the check; `Legacy`
/// keeps that behaviour available so it can be asserted in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessChecks {
    /// Authorise every operation against the entity owner.
    #[default]
    Strict,
    /// Skip ownership checks on group get/remove and document update/remove.
    Legacy,
}

impl AccessChecks {
    pub fn is_strict(self) -> bool {
        self == AccessChecks::Strict
    }
}

/// Connection settings for a [`Database`].
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// How long a statement waits on a locked database before failing
    pub busy_timeout: Duration,
    /// Ownership checks applied by the group and document managers
    pub access_checks: AccessChecks,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_FILE),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
            access_checks: AccessChecks::default(),
        }
    }
}

impl DatabaseConfig {
    /// Default settings for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_access_checks(mut self, access_checks: AccessChecks) -> Self {
        self.access_checks = access_checks;
        self
    }
}

/// Handle to the backing SQLite database.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    access_checks: AccessChecks,
}

impl Database {
    /// Open the database file at `path`, creating the file and schema if missing.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(&DatabaseConfig::new(path.as_ref())).await
    }

    /// Open a database file with explicit settings.
    pub async fn open_with_config(config: &DatabaseConfig) -> Result<Self> {
        // - journal_mode=WAL: readers do not block the single writer
        // - synchronous=NORMAL: safe with WAL
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::from_sqlx("Failed to open SQLite database", e))?;

        tracing::info!(path = %config.path.display(), "Opened database");

        let database = Self {
            pool,
            access_checks: config.access_checks,
        };
        schema::initialize(&database).await?;
        Ok(database)
    }

    /// Create a private in-memory database with strict access checks.
    pub async fn in_memory() -> Result<Self> {
        Self::in_memory_with_access_checks(AccessChecks::Strict).await
    }

    /// Create a private in-memory database.
    ///
    /// The database lives as long as the pool; a unique shared-cache name keeps
    /// every pooled connection on the same data without leaking between handles.
    pub async fn in_memory_with_access_checks(access_checks: AccessChecks) -> Result<Self> {
        let unique_id = uuid::Uuid::new_v4();
        let url = format!("sqlite:file:mem_{unique_id}?mode=memory&cache=shared");

        // The in-memory database is destroyed once the last connection closes.
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(&url)
            .await
            .map_err(|e| DatabaseError::from_sqlx("Failed to create in-memory database", e))?;

        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx("Failed to configure SQLite", e))?;

        let database = Self {
            pool,
            access_checks,
        };
        schema::initialize(&database).await?;
        Ok(database)
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Ownership checks this handle applies.
    pub fn access_checks(&self) -> AccessChecks {
        self.access_checks
    }

    /// Drop all tables and recreate an empty schema.
    pub async fn reset(&self) -> Result<()> {
        schema::reset(self).await
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Check whether a database file exists at `path`.
pub async fn exists(path: impl AsRef<Path>) -> bool {
    tokio::fs::try_exists(path.as_ref()).await.unwrap_or(false)
}
