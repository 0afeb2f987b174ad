//! Group manager
//!
//! Groups are named collections of documents. A document points at its group
//! through the `document_group` column; the group itself only stores its
//! name, owner and public flag.
//!
//! Under [`AccessChecks::Legacy`](crate::AccessChecks::Legacy) `get` and
//! `remove` skip the ownership checks, matching the historical behaviour.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::{self, AccessPolicy, AccountId};
use crate::advisory::AdvisoryExt;
use crate::database::query::{self, Column, FieldSet, SelectOptions};
use crate::database::{Database, SqlValue};
use crate::{Error, Result};

pub const TABLE: &str = "document_group";
pub const COLUMN_ID: &str = "id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_OWNER: &str = "owner";
pub const COLUMN_PUBLIC: &str = "public";

const COLUMNS: [Column; 4] = [
    Column::new(COLUMN_ID),
    Column::new(COLUMN_NAME),
    Column::new(COLUMN_OWNER),
    Column::new(COLUMN_PUBLIC),
];

#[derive(Error, Debug)]
pub enum GroupError {
    #[error("Group not found: {id}")]
    NotExisting { id: GroupId },

    #[error("Group owner account not found: {id}")]
    OwnerNotExisting { id: AccountId },
}

impl GroupError {
    /// Check if this error indicates a group or its owner was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GroupError::NotExisting { .. } | GroupError::OwnerNotExisting { .. }
        )
    }
}

impl From<GroupError> for Error {
    fn from(err: GroupError) -> Self {
        Error::Group(err)
    }
}

/// Numeric group identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<GroupId> for SqlValue {
    fn from(id: GroupId) -> Self {
        SqlValue::Integer(id.0)
    }
}

/// Input for [`create`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    #[serde(default)]
    pub public: bool,
}

/// Input for [`update`]. Only present fields are written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateGroup {
    pub id: GroupId,
    pub name: Option<String>,
    pub public: Option<bool>,
}

/// A stored group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub owner: AccountId,
    pub public: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct GroupRow {
    id: i64,
    name: String,
    owner: i64,
    public: bool,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group {
            id: GroupId(row.id),
            name: row.name,
            owner: AccountId(row.owner),
            public: row.public,
        }
    }
}

/// Create a group owned by `owner`.
pub async fn create(database: &Database, owner: AccountId, input: &CreateGroup) -> Result<GroupId> {
    if !account::exists(database, owner).await {
        return Err(GroupError::OwnerNotExisting { id: owner }.into());
    }

    let (statement, params) = FieldSet::new()
        .set(COLUMN_NAME, input.name.as_str())
        .set(COLUMN_OWNER, owner)
        .set(COLUMN_PUBLIC, input.public)
        .into_insert(TABLE);
    let result = database.post(&statement, &params).await?;

    let id = GroupId(result.last_insert_id);
    tracing::debug!(%id, %owner, "Created group");
    Ok(id)
}

/// Whether group `id` exists. Storage failures read as `false`.
pub async fn exists(database: &Database, id: GroupId) -> bool {
    try_exists(database, id).await.or_false("group.exists")
}

/// Whether group `id` exists, propagating storage failures.
pub(crate) async fn try_exists(database: &Database, id: GroupId) -> Result<bool> {
    database
        .get_exists(&query::exists(TABLE, COLUMN_ID), &[id.into()])
        .await
}

async fn fetch(database: &Database, id: GroupId) -> Result<Option<Group>> {
    let statement = query::select(TABLE, &COLUMNS, SelectOptions::filter(COLUMN_ID));
    let row: Option<GroupRow> = database.get_one(&statement, &[id.into()]).await?;
    Ok(row.map(Group::from))
}

/// Read group `id`; absent when it does not exist.
///
/// With strict access checks the requester must pass the visibility policy
/// against the group owner.
pub async fn get(
    database: &Database,
    requester: Option<AccountId>,
    id: GroupId,
) -> Result<Option<Group>> {
    let Some(group) = fetch(database, id).await? else {
        return Ok(None);
    };
    if database.access_checks().is_strict() {
        AccessPolicy::visibility(requester, group.owner, group.public)
            .check(database)
            .await?;
    }
    Ok(Some(group))
}

/// Every group owned by `owner`, oldest first.
pub async fn get_all_from_owner(database: &Database, owner: AccountId) -> Result<Vec<Group>> {
    let statement = query::select(
        TABLE,
        &COLUMNS,
        SelectOptions::filter(COLUMN_OWNER).order_by(COLUMN_ID),
    );
    let rows: Vec<GroupRow> = database.get_all(&statement, &[owner.into()]).await?;
    Ok(rows.into_iter().map(Group::from).collect())
}

/// Apply the fields present in `input`. The requester must own the group or be an admin.
pub async fn update(database: &Database, requester: AccountId, input: &UpdateGroup) -> Result<bool> {
    let Some(group) = fetch(database, input.id).await? else {
        return Err(GroupError::NotExisting { id: input.id }.into());
    };
    AccessPolicy::direct(requester, group.owner)
        .check(database)
        .await?;

    let fields = FieldSet::new()
        .set_if(COLUMN_NAME, input.name.clone())
        .set_if(COLUMN_PUBLIC, input.public);
    if fields.is_empty() {
        return Ok(false);
    }
    let (statement, params) = fields.into_update(TABLE, COLUMN_ID, input.id);
    let result = database
        .post(&statement, &params)
        .await?
        .expect_changes(format_args!("group {}", input.id))?;
    tracing::debug!(id = %input.id, changes = result.changes, "Updated group");
    Ok(true)
}

/// Delete group `id`.
///
/// With strict access checks an unknown id fails with
/// [`GroupError::NotExisting`] and the requester must own the group or be an
/// admin. Documents in the group keep their group reference.
pub async fn remove(database: &Database, requester: AccountId, id: GroupId) -> Result<bool> {
    if database.access_checks().is_strict() {
        let Some(group) = fetch(database, id).await? else {
            return Err(GroupError::NotExisting { id }.into());
        };
        AccessPolicy::direct(requester, group.owner)
            .check(database)
            .await?;
    }

    let result = database
        .post(&query::remove(TABLE, COLUMN_ID), &[id.into()])
        .await?;
    tracing::debug!(%id, %requester, "Removed group");
    Ok(result.changes > 0)
}
