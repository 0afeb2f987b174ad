//! SQL schema definitions and migrations.
//!
//! # Migration System
//!
//! Migrations are code-based: each one is an async function that receives the
//! database handle and executes whatever statements the change needs.
//!
//! ## Adding a New Migration
//!
//! 1. Increment `SCHEMA_VERSION`
//! 2. Add a new `migrate_vN_to_vM` async function
//! 3. Add the migration to the match statement in `run_migration`
//!
//! Relationships between tables (owner, group, friend edges) are plain
//! integer columns without foreign keys: removing an account neither cascades
//! nor is blocked by rows that still reference it.

use super::{Database, DatabaseError};
use crate::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i64 = 1;

/// Tables in dependency-free creation order.
pub const TABLES: &[&str] = &[
    "schema_version",
    "account",
    "account_friend",
    "document_group",
    "document",
];

/// SQL statements to create the schema tables.
pub const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER PRIMARY KEY
    )",
    // Flags are stored as 0/1 integers
    "CREATE TABLE IF NOT EXISTS account (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        admin INTEGER NOT NULL DEFAULT 0,
        public INTEGER NOT NULL DEFAULT 0,
        password_hash TEXT NOT NULL,
        password_salt TEXT NOT NULL
    )",
    // Directed edge: friend_account_id may see account_id's private entities
    "CREATE TABLE IF NOT EXISTS account_friend (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id INTEGER NOT NULL,
        friend_account_id INTEGER NOT NULL,
        UNIQUE (account_id, friend_account_id)
    )",
    "CREATE TABLE IF NOT EXISTS document_group (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        owner INTEGER NOT NULL,
        public INTEGER NOT NULL DEFAULT 0
    )",
    // pdf_options holds serialized JSON and is never queried by content
    "CREATE TABLE IF NOT EXISTS document (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        authors TEXT,
        date TEXT,
        owner INTEGER NOT NULL,
        document_group INTEGER,
        public INTEGER NOT NULL DEFAULT 0,
        pdf_options TEXT
    )",
];

/// SQL statements to create indexes.
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_account_friend_account ON account_friend(account_id)",
    "CREATE INDEX IF NOT EXISTS idx_document_group_owner ON document_group(owner)",
    "CREATE INDEX IF NOT EXISTS idx_document_owner ON document(owner)",
    "CREATE INDEX IF NOT EXISTS idx_document_group ON document(document_group)",
];

fn schema_error(context: &str, statement: &str, e: sqlx::Error) -> DatabaseError {
    DatabaseError::SqlxError {
        reason: format!("{context}: {e} - SQL: {statement}"),
        source: Some(e),
    }
}

/// Initialize the database schema.
///
/// Creates tables and indexes if they don't exist, and handles migrations
/// if the schema version has changed.
pub async fn initialize(database: &Database) -> Result<()> {
    let pool = database.pool();

    for statement in CREATE_TABLES {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| schema_error("Schema creation failed", statement, e))?;
    }

    let row: Option<(i64,)> = sqlx::query_as("SELECT version FROM schema_version")
        .fetch_optional(pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx("Failed to check schema version", e))?;

    match row {
        None => {
            sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
                .bind(SCHEMA_VERSION)
                .execute(pool)
                .await
                .map_err(|e| DatabaseError::from_sqlx("Failed to initialize schema version", e))?;
            tracing::info!(version = SCHEMA_VERSION, "Initialized database schema");
        }
        Some((current,)) if current < SCHEMA_VERSION => {
            migrate(database, current, SCHEMA_VERSION).await?;
        }
        Some(_) => {}
    }

    for statement in CREATE_INDEXES {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| schema_error("Index creation failed", statement, e))?;
    }

    Ok(())
}

/// Drop every table and recreate an empty schema.
pub async fn reset(database: &Database) -> Result<()> {
    tracing::info!("Resetting database");
    for table in TABLES.iter().rev() {
        let statement = format!("DROP TABLE IF EXISTS {table}");
        sqlx::query(&statement)
            .execute(database.pool())
            .await
            .map_err(|e| schema_error("Dropping table failed", &statement, e))?;
    }
    initialize(database).await
}

/// Run migrations sequentially from one schema version to another.
async fn migrate(database: &Database, from: i64, to: i64) -> Result<()> {
    tracing::info!(from, to, "Starting schema migration");

    let mut current = from;
    while current < to {
        let next = current + 1;
        run_migration(database, current, next).await?;

        sqlx::query("UPDATE schema_version SET version = ?")
            .bind(next)
            .execute(database.pool())
            .await
            .map_err(|e| DatabaseError::from_sqlx("Failed to update schema version", e))?;

        tracing::info!(version = next, "Migration completed");
        current = next;
    }
    Ok(())
}

/// Execute a single migration step.
///
/// No migrations exist yet; reaching this means `SCHEMA_VERSION` was
/// incremented without adding one.
async fn run_migration(database: &Database, from: i64, to: i64) -> Result<()> {
    let _ = database;
    Err(DatabaseError::UnknownMigration { from, to }.into())
}
