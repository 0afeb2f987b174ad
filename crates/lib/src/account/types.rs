//! Core data types for accounts

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::database::SqlValue;

/// Smallest accepted account name length.
pub const NAME_MIN_LENGTH: usize = 4;
/// Largest accepted account name length.
pub const NAME_MAX_LENGTH: usize = 16;
/// Smallest accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Human readable account name rule.
pub const NAME_FORMAT_INFO: &str = "The account name must be between 4 and 16 characters";
/// Human readable password rule.
pub const PASSWORD_FORMAT_INFO: &str = "The password must be at least 6 characters long";

/// Numeric account identifier generated by the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for AccountId {
    fn from(id: i64) -> Self {
        AccountId(id)
    }
}

impl From<AccountId> for SqlValue {
    fn from(id: AccountId) -> Self {
        SqlValue::Integer(id.0)
    }
}

/// Input for [`create`](super::create).
#[derive(Clone, Default, Deserialize)]
pub struct CreateAccount {
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub public: bool,
}

impl CreateAccount {
    /// A non-admin, private account.
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }
}

impl fmt::Debug for CreateAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateAccount")
            .field("name", &self.name)
            .field("admin", &self.admin)
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// Input for [`update`](super::update). Only present fields are written.
#[derive(Clone, Deserialize)]
pub struct UpdateAccount {
    pub id: AccountId,
    pub name: Option<String>,
    pub password: Option<String>,
    pub admin: Option<bool>,
    pub public: Option<bool>,
}

impl UpdateAccount {
    /// An update of `id` that changes nothing yet.
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            name: None,
            password: None,
            admin: None,
            public: None,
        }
    }
}

impl fmt::Debug for UpdateAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateAccount")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("admin", &self.admin)
            .field("public", &self.public)
            .finish()
    }
}

/// Login credentials.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub name: String,
    pub password: String,
}

impl Credentials {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Account information safe to hand out. Never includes password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub admin: bool,
    pub public: bool,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AccountRow {
    pub id: i64,
    pub name: String,
    pub admin: bool,
    pub public: bool,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: AccountId(row.id),
            name: row.name,
            admin: row.admin,
            public: row.public,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct CredentialRow {
    pub id: i64,
    pub password_hash: String,
    pub password_salt: String,
}

/// Whether `name` is 4 to 16 word characters (`[A-Za-z0-9_]`).
pub fn is_valid_name(name: &str) -> bool {
    (NAME_MIN_LENGTH..=NAME_MAX_LENGTH).contains(&name.len())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether `password` starts with at least 6 characters before any line break.
pub fn is_valid_password(password: &str) -> bool {
    password
        .chars()
        .take_while(|c| !matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}'))
        .count()
        >= PASSWORD_MIN_LENGTH
}
