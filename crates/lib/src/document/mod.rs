//! Document manager
//!
//! Documents belong to an owner account and optionally to a group. Reads are
//! gated by the visibility policy; mutations by the direct policy unless the
//! database runs with [`AccessChecks::Legacy`](crate::AccessChecks::Legacy).
//!
//! The `content` and `pdf_options` columns can be large and are only selected
//! when the caller asks for them.

pub mod errors;
pub mod types;

pub use errors::DocumentError;
pub use types::*;

use crate::account::{self, AccessPolicy, AccountId};
use crate::advisory::AdvisoryExt;
use crate::database::query::{self, Column, FieldSet, SelectOptions};
use crate::database::Database;
use crate::group::{self, GroupId};
use crate::{Error, Result};

pub const TABLE: &str = "document";
pub const COLUMN_ID: &str = "id";
pub const COLUMN_TITLE: &str = "title";
pub const COLUMN_CONTENT: &str = "content";
pub const COLUMN_AUTHORS: &str = "authors";
pub const COLUMN_DATE: &str = "date";
pub const COLUMN_OWNER: &str = "owner";
pub const COLUMN_GROUP: &str = "document_group";
pub const COLUMN_PUBLIC: &str = "public";
pub const COLUMN_PDF_OPTIONS: &str = "pdf_options";

const GROUP_ALIAS: &str = "group_id";

/// Columns every read returns.
const METADATA_COLUMNS: [Column; 7] = [
    Column::new(COLUMN_ID),
    Column::new(COLUMN_TITLE),
    Column::new(COLUMN_AUTHORS),
    Column::new(COLUMN_DATE),
    Column::new(COLUMN_OWNER),
    Column::aliased(COLUMN_GROUP, GROUP_ALIAS),
    Column::new(COLUMN_PUBLIC),
];

fn projection(get_content: bool, get_pdf_options: bool) -> Vec<Column> {
    let mut columns = METADATA_COLUMNS.to_vec();
    if get_content {
        columns.push(Column::new(COLUMN_CONTENT));
    }
    if get_pdf_options {
        columns.push(Column::new(COLUMN_PDF_OPTIONS));
    }
    columns
}

async fn ensure_group_exists(database: &Database, id: Option<GroupId>) -> Result<()> {
    if let Some(id) = id
        && !group::try_exists(database, id).await?
    {
        return Err(DocumentError::GroupNotExisting { id }.into());
    }
    Ok(())
}

/// Create a document owned by `input.owner`.
///
/// The owner must exist, the requester must be the owner or an admin, and a
/// given group must exist.
pub async fn create(
    database: &Database,
    requester: AccountId,
    input: &CreateDocument,
) -> Result<DocumentId> {
    if !account::exists(database, input.owner).await {
        return Err(DocumentError::AccountNotExisting { id: input.owner }.into());
    }
    if input.owner != requester && !account::is_admin(database, Some(requester)).await {
        return Err(DocumentError::Forbidden {
            requester,
            owner: input.owner,
        }
        .into());
    }
    ensure_group_exists(database, input.group).await?;
    if !input.resources.is_empty() {
        // TODO: persist resources in a document_resource table
        tracing::debug!(count = input.resources.len(), "Ignoring document resources");
    }

    let pdf_options = input
        .pdf_options
        .as_ref()
        .map(PdfOptions::to_column)
        .transpose()?;
    let (statement, params) = FieldSet::new()
        .set(COLUMN_TITLE, input.title.as_str())
        .set(COLUMN_CONTENT, input.content.as_str())
        .set(COLUMN_OWNER, input.owner)
        .set_if(COLUMN_AUTHORS, input.authors.clone())
        .set_if(COLUMN_DATE, input.date.clone())
        .set_if(COLUMN_PDF_OPTIONS, pdf_options)
        .set_if(COLUMN_GROUP, input.group)
        .set(COLUMN_PUBLIC, input.public)
        .into_insert(TABLE);
    let result = database.post(&statement, &params).await?;

    let id = DocumentId(result.last_insert_id);
    tracing::debug!(%id, owner = %input.owner, %requester, "Created document");
    Ok(id)
}

/// Whether document `id` exists. Storage failures read as `false`.
pub async fn exists(database: &Database, id: DocumentId) -> bool {
    try_exists(database, id).await.or_false("document.exists")
}

async fn try_exists(database: &Database, id: DocumentId) -> Result<bool> {
    database
        .get_exists(&query::exists(TABLE, COLUMN_ID), &[id.into()])
        .await
}

/// Read a document if the requester passes the visibility policy against its owner.
///
/// Fails with [`DocumentError::NotExisting`] for an unknown id.
pub async fn get(
    database: &Database,
    requester: Option<AccountId>,
    input: &GetDocument,
) -> Result<Option<Document>> {
    if !try_exists(database, input.id).await? {
        return Err(DocumentError::NotExisting { id: input.id }.into());
    }

    let statement = query::select(
        TABLE,
        &projection(input.get_content, input.get_pdf_options),
        SelectOptions::filter(COLUMN_ID),
    );
    let row: Option<DocumentRow> = database.get_one(&statement, &[input.id.into()]).await?;
    let Some(row) = row else {
        return Err(Error::vanished(format_args!("document {}", input.id)));
    };

    AccessPolicy::visibility(requester, AccountId(row.owner), row.public)
        .check(database)
        .await?;
    row.into_document().map(Some)
}

async fn owner_of(database: &Database, id: DocumentId) -> Result<AccountId> {
    let statement = query::select(
        TABLE,
        &[Column::new(COLUMN_OWNER)],
        SelectOptions::filter(COLUMN_ID),
    );
    let row: Option<(i64,)> = database.get_one(&statement, &[id.into()]).await?;
    match row {
        Some((owner,)) => Ok(AccountId(owner)),
        None => Err(DocumentError::NotExisting { id }.into()),
    }
}

/// Apply the fields present in `input`.
///
/// Fails with [`DocumentError::NotExisting`] for an unknown id. With strict
/// access checks the requester must own the document or be an admin.
/// `pdf_options` replaces the stored options as a whole.
pub async fn update(
    database: &Database,
    requester: AccountId,
    input: &UpdateDocument,
) -> Result<bool> {
    let owner = owner_of(database, input.id).await?;
    if database.access_checks().is_strict() {
        AccessPolicy::direct(requester, owner).check(database).await?;
    }
    ensure_group_exists(database, input.group).await?;

    let pdf_options = input
        .pdf_options
        .as_ref()
        .map(PdfOptions::to_column)
        .transpose()?;
    let fields = FieldSet::new()
        .set_if(COLUMN_TITLE, input.title.clone())
        .set_if(COLUMN_CONTENT, input.content.clone())
        .set_if(COLUMN_AUTHORS, input.authors.clone())
        .set_if(COLUMN_DATE, input.date.clone())
        .set_if(COLUMN_PDF_OPTIONS, pdf_options)
        .set_if(COLUMN_PUBLIC, input.public)
        .set_if(COLUMN_GROUP, input.group);
    if fields.is_empty() {
        return Ok(false);
    }

    let (statement, params) = fields.into_update(TABLE, COLUMN_ID, input.id);
    let result = database
        .post(&statement, &params)
        .await?
        .expect_changes(format_args!("document {}", input.id))?;
    tracing::debug!(id = %input.id, %requester, changes = result.changes, "Updated document");
    Ok(true)
}

/// Delete document `id`.
///
/// With strict access checks an unknown id fails with
/// [`DocumentError::NotExisting`] and the requester must own the document or
/// be an admin.
pub async fn remove(database: &Database, requester: AccountId, id: DocumentId) -> Result<bool> {
    if database.access_checks().is_strict() {
        let owner = owner_of(database, id).await?;
        AccessPolicy::direct(requester, owner).check(database).await?;
    }

    let result = database
        .post(&query::remove(TABLE, COLUMN_ID), &[id.into()])
        .await?;
    tracing::debug!(%id, %requester, "Removed document");
    Ok(result.changes > 0)
}

async fn get_all_by(
    database: &Database,
    column: &'static str,
    value: i64,
    get_contents: bool,
) -> Result<Vec<Document>> {
    let statement = query::select(
        TABLE,
        &projection(get_contents, false),
        SelectOptions::filter(column).order_by(COLUMN_ID),
    );
    let rows: Vec<DocumentRow> = database.get_all(&statement, &[value.into()]).await?;
    rows.into_iter().map(DocumentRow::into_document).collect()
}

/// Every document owned by `owner`, oldest first. No access check.
pub async fn get_all_from_owner(
    database: &Database,
    owner: AccountId,
    get_contents: bool,
) -> Result<Vec<Document>> {
    get_all_by(database, COLUMN_OWNER, owner.0, get_contents).await
}

/// Every document in group `group`, oldest first. No access check.
pub async fn get_all_from_group(
    database: &Database,
    group: GroupId,
    get_contents: bool,
) -> Result<Vec<Document>> {
    get_all_by(database, COLUMN_GROUP, group.0, get_contents).await
}
