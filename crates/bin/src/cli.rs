//! CLI argument definitions for the texdocs binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use texdocs::database::DEFAULT_DATABASE_FILE;
use texdocs::{AccessChecks, DatabaseConfig};

/// texdocs database administration
#[derive(Parser, Debug)]
#[command(name = "texdocs")]
#[command(about = "texdocs: manage the document database")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options for opening the database file
#[derive(clap::Args, Debug)]
pub struct DatabaseArgs {
    /// Path to the SQLite database file
    #[arg(short = 'd', long = "database", default_value = DEFAULT_DATABASE_FILE, env = "TEXDOCS_DATABASE")]
    pub path: PathBuf,

    /// Maximum number of pooled connections
    #[arg(long, default_value_t = 5, env = "TEXDOCS_MAX_CONNECTIONS")]
    pub max_connections: u32,

    /// Seconds to wait on a locked database
    #[arg(long, env = "TEXDOCS_BUSY_TIMEOUT", default_value_t = 5)]
    pub busy_timeout: u64,

    /// Skip ownership checks on group get/remove and document update/remove
    #[arg(long, env = "TEXDOCS_LEGACY_ACCESS")]
    pub legacy_access: bool,
}

impl DatabaseArgs {
    pub fn config(&self) -> DatabaseConfig {
        let access_checks = if self.legacy_access {
            AccessChecks::Legacy
        } else {
            AccessChecks::Strict
        };
        DatabaseConfig {
            path: self.path.clone(),
            max_connections: self.max_connections,
            busy_timeout: Duration::from_secs(self.busy_timeout),
            access_checks,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database file and schema if missing
    Init,
    /// Drop every table and recreate an empty schema
    Reset(ResetArgs),
    /// Account management
    #[command(subcommand)]
    Account(AccountCommands),
    /// Document queries
    #[command(subcommand)]
    Document(DocumentCommands),
}

/// Arguments for the reset command
#[derive(clap::Args, Debug)]
pub struct ResetArgs {
    /// Confirm that all data should be deleted
    #[arg(long)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Create an account
    Create(AccountCreateArgs),
    /// Check a name/password pair
    Login(AccountLoginArgs),
}

#[derive(clap::Args, Debug)]
pub struct AccountCreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub password: String,

    /// Grant admin rights
    #[arg(long)]
    pub admin: bool,

    /// Make the account and its entities visible to everyone
    #[arg(long)]
    pub public: bool,
}

#[derive(clap::Args, Debug)]
pub struct AccountLoginArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum DocumentCommands {
    /// List the documents of an account
    List(DocumentListArgs),
}

#[derive(clap::Args, Debug)]
pub struct DocumentListArgs {
    /// Owner account id
    #[arg(long)]
    pub owner: i64,

    /// Include document contents
    #[arg(long)]
    pub contents: bool,
}
