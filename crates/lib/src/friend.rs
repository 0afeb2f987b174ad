//! Friend manager
//!
//! A friend edge `(account_id, friend_account_id)` lets `friend_account_id`
//! read entities `account_id` owns that are not public. Edges are directed:
//! a mutual friendship is two edges.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::{self, AccessPolicy, AccountId};
use crate::advisory::AdvisoryExt;
use crate::database::query::{self, Column, FieldSet, SelectOptions};
use crate::database::{Database, DatabaseError, SqlValue};
use crate::{Error, Result};

pub const TABLE: &str = "account_friend";
pub const COLUMN_ID: &str = "id";
pub const COLUMN_ACCOUNT_ID: &str = "account_id";
pub const COLUMN_FRIEND_ACCOUNT_ID: &str = "friend_account_id";

const COLUMNS: [Column; 3] = [
    Column::new(COLUMN_ID),
    Column::new(COLUMN_ACCOUNT_ID),
    Column::new(COLUMN_FRIEND_ACCOUNT_ID),
];

#[derive(Error, Debug)]
pub enum FriendError {
    #[error("Account not found: {id}")]
    AccountNotExisting { id: AccountId },

    #[error("Friend entry not found: {id}")]
    NotExisting { id: FriendId },

    #[error("Account {friend_account_id} is already a friend of account {account_id}")]
    AlreadyExists {
        account_id: AccountId,
        friend_account_id: AccountId,
    },
}

impl FriendError {
    /// Check if this error indicates the edge already exists.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, FriendError::AlreadyExists { .. })
    }

    /// Check if this error indicates an edge or account was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FriendError::AccountNotExisting { .. } | FriendError::NotExisting { .. }
        )
    }
}

impl From<FriendError> for Error {
    fn from(err: FriendError) -> Self {
        Error::Friend(err)
    }
}

/// Numeric friend edge identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FriendId(pub i64);

impl fmt::Display for FriendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<FriendId> for SqlValue {
    fn from(id: FriendId) -> Self {
        SqlValue::Integer(id.0)
    }
}

/// The two ends of an edge: does `friend` have `account` as a friend?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FriendPair {
    pub account: AccountId,
    pub friend: AccountId,
}

/// Input for [`create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CreateFriend {
    pub account_id: AccountId,
    pub friend_account_id: AccountId,
}

/// Input for [`create_by_name`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateFriendByName {
    pub account_id: AccountId,
    pub friend_account_name: String,
}

/// A stored friend edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub id: FriendId,
    pub account_id: AccountId,
    pub friend_account_id: AccountId,
}

#[derive(Debug, sqlx::FromRow)]
struct FriendRow {
    id: i64,
    account_id: i64,
    friend_account_id: i64,
}

impl From<FriendRow> for Friend {
    fn from(row: FriendRow) -> Self {
        Friend {
            id: FriendId(row.id),
            account_id: AccountId(row.account_id),
            friend_account_id: AccountId(row.friend_account_id),
        }
    }
}

/// Record `input.friend_account_id` as a friend of `input.account_id`.
///
/// Both accounts must exist and the requester must be `account_id` or an admin.
pub async fn create(database: &Database, requester: AccountId, input: CreateFriend) -> Result<FriendId> {
    for id in [input.account_id, input.friend_account_id] {
        if !account::exists(database, id).await {
            return Err(FriendError::AccountNotExisting { id }.into());
        }
    }
    AccessPolicy::direct(requester, input.account_id)
        .check(database)
        .await?;

    let (statement, params) = FieldSet::new()
        .set(COLUMN_ACCOUNT_ID, input.account_id)
        .set(COLUMN_FRIEND_ACCOUNT_ID, input.friend_account_id)
        .into_insert(TABLE);
    let result = database
        .post(&statement, &params)
        .await
        .map_err(|e| match e {
            Error::Database(DatabaseError::UniqueViolation { .. }) => FriendError::AlreadyExists {
                account_id: input.account_id,
                friend_account_id: input.friend_account_id,
            }
            .into(),
            other => other,
        })?;

    let id = FriendId(result.last_insert_id);
    tracing::debug!(%id, account = %input.account_id, friend = %input.friend_account_id, "Created friend entry");
    Ok(id)
}

/// Like [`create`], naming the friend account instead of giving its id.
pub async fn create_by_name(
    database: &Database,
    requester: AccountId,
    input: &CreateFriendByName,
) -> Result<FriendId> {
    let Some(friend_account_id) = account::id_by_name(database, &input.friend_account_name).await?
    else {
        return Err(account::AccountError::NameNotExisting {
            name: input.friend_account_name.clone(),
        }
        .into());
    };
    create(
        database,
        requester,
        CreateFriend {
            account_id: input.account_id,
            friend_account_id,
        },
    )
    .await
}

/// Whether the friend edge `id` exists. Storage failures read as `false`.
pub async fn exists(database: &Database, id: FriendId) -> bool {
    database
        .get_exists(&query::exists(TABLE, COLUMN_ID), &[id.into()])
        .await
        .or_false("friend.exists")
}

/// Whether `pair.friend` is recorded as a friend of `pair.account`.
///
/// Used by the visibility policy; storage failures read as `false`.
pub async fn exists_account_and_friend_account(database: &Database, pair: FriendPair) -> bool {
    database
        .get_exists(
            &query::exists_all(TABLE, &[COLUMN_ACCOUNT_ID, COLUMN_FRIEND_ACCOUNT_ID]),
            &[pair.account.into(), pair.friend.into()],
        )
        .await
        .or_false("friend.exists_account_and_friend_account")
}

/// Read friend edge `id`.
pub async fn get(database: &Database, id: FriendId) -> Result<Option<Friend>> {
    let statement = query::select(TABLE, &COLUMNS, SelectOptions::filter(COLUMN_ID));
    let row: Option<FriendRow> = database.get_one(&statement, &[id.into()]).await?;
    Ok(row.map(Friend::from))
}

/// Every edge whose `account_id` is `account_id`, oldest first.
pub async fn get_all_from_account(database: &Database, account_id: AccountId) -> Result<Vec<Friend>> {
    let statement = query::select(
        TABLE,
        &COLUMNS,
        SelectOptions::filter(COLUMN_ACCOUNT_ID).order_by(COLUMN_ID),
    );
    let rows: Vec<FriendRow> = database.get_all(&statement, &[account_id.into()]).await?;
    Ok(rows.into_iter().map(Friend::from).collect())
}

/// Delete friend edge `id`. The requester must own the edge's account or be an admin.
pub async fn remove(database: &Database, requester: AccountId, id: FriendId) -> Result<bool> {
    let Some(edge) = get(database, id).await? else {
        return Err(FriendError::NotExisting { id }.into());
    };
    AccessPolicy::direct(requester, edge.account_id)
        .check(database)
        .await?;

    let result = database
        .post(&query::remove(TABLE, COLUMN_ID), &[id.into()])
        .await?;
    tracing::debug!(%id, %requester, "Removed friend entry");
    Ok(result.changes > 0)
}
