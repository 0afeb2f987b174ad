//! texdocs: the data-access core of a document authoring service.
//!
//! This library owns accounts, friend relationships, document groups and
//! documents stored in a single embedded SQLite file, and enforces the
//! ownership and visibility rules every caller has to pass.
//!
//! ## Core Concepts
//!
//! * **Database (`database::Database`)**: A cloneable handle over one SQLite file. All
//!   statements are produced by the query builder in `database::query` and executed through
//!   the request layer (`get_one`, `get_all`, `post`).
//! * **Accounts (`account`)**: Identities with a unique name, an Argon2id password hash, an
//!   admin flag and a public flag. The module also hosts the access policies
//!   (`account::AccessPolicy`) every other manager authorises through.
//! * **Friends (`friend`)**: Directed edges between accounts. A friend of an account may read
//!   that account's private entities.
//! * **Groups (`group`)**: Named collections of documents with an owner and a public flag.
//! * **Documents (`document`)**: Title, content, optional metadata and an optional structured
//!   PDF export configuration (`document::PdfOptions`).
//!
//! Every manager function takes the database handle, the requesting account (if any) and a
//! plain input record, re-validates existence and ownership, and only then touches storage.

pub mod account;
pub mod crypto;
pub mod database;
pub mod document;
pub mod friend;
pub mod group;

mod advisory;

pub use database::{AccessChecks, Database, DatabaseConfig};

/// Result type used throughout the texdocs library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the texdocs library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured storage errors from the database module
    #[error(transparent)]
    Database(database::DatabaseError),

    /// Structured account errors from the account module
    #[error(transparent)]
    Account(account::AccountError),

    /// Structured friend errors from the friend module
    #[error(transparent)]
    Friend(friend::FriendError),

    /// Structured group errors from the group module
    #[error(transparent)]
    Group(group::GroupError),

    /// Structured document errors from the document module
    #[error(transparent)]
    Document(document::DocumentError),

    /// A post-condition the caller relied on did not hold.
    #[error("Internal inconsistency: {reason}")]
    InternalInconsistency { reason: String },
}

impl Error {
    /// A row that was just confirmed to exist is gone.
    pub(crate) fn vanished(what: impl std::fmt::Display) -> Self {
        Error::InternalInconsistency {
            reason: format!("{what} disappeared between the existence check and the statement"),
        }
    }

    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Database(_) => "database",
            Error::Account(_) => "account",
            Error::Friend(_) => "friend",
            Error::Group(_) => "group",
            Error::Document(_) => "document",
            Error::InternalInconsistency { .. } => "internal",
        }
    }

    /// Check if this error is a rejected name or password format.
    pub fn is_validation(&self) -> bool {
        match self {
            Error::Account(err) => err.is_validation(),
            _ => false,
        }
    }

    /// Check if this error indicates the entity already exists.
    pub fn is_already_exists(&self) -> bool {
        match self {
            Error::Database(err) => err.is_unique_violation(),
            Error::Account(err) => err.is_already_exists(),
            Error::Friend(err) => err.is_already_exists(),
            _ => false,
        }
    }

    /// Check if this error indicates a referenced entity was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Account(err) => err.is_not_found(),
            Error::Friend(err) => err.is_not_found(),
            Error::Group(err) => err.is_not_found(),
            Error::Document(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates an access policy rejected the requester.
    pub fn is_no_access(&self) -> bool {
        match self {
            Error::Account(err) => err.is_no_access(),
            Error::Document(err) => err.is_forbidden(),
            _ => false,
        }
    }

    /// Check if this error is an internal inconsistency.
    pub fn is_internal_inconsistency(&self) -> bool {
        matches!(self, Error::InternalInconsistency { .. })
    }

    /// HTTP-style status hint for the outer layer, when the error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Document(err) => err.status_code(),
            _ => None,
        }
    }
}
