//! Document data types and their storage representation.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::account::AccountId;
use crate::database::{DatabaseError, SqlValue};
use crate::group::GroupId;
use crate::Result;

use super::COLUMN_PDF_OPTIONS;

/// Numeric document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub i64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<DocumentId> for SqlValue {
    fn from(id: DocumentId) -> Self {
        SqlValue::Integer(id.0)
    }
}

/// PDF export configuration of a document.
///
/// Arbitrary key/value options. Stored as one JSON text column and only
/// converted at the storage boundary; updates replace the whole object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PdfOptions(Map<String, Value>);

impl PdfOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub(crate) fn to_column(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|source| {
            DatabaseError::SerializationFailed {
                column: COLUMN_PDF_OPTIONS,
                source,
            }
            .into()
        })
    }

    pub(crate) fn from_column(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| {
            DatabaseError::DeserializationFailed {
                column: COLUMN_PDF_OPTIONS,
                source,
            }
            .into()
        })
    }
}

impl From<Map<String, Value>> for PdfOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// An auxiliary file shipped with a document (images, bibliography, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentResource {
    pub relative_path: String,
    pub content: Vec<u8>,
}

/// Input for [`create`](super::create).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateDocument {
    pub owner: AccountId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub pdf_options: Option<PdfOptions>,
    /// Accepted but not persisted yet
    #[serde(default)]
    pub resources: Vec<DocumentResource>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub group: Option<GroupId>,
}

impl CreateDocument {
    pub fn new(owner: AccountId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            owner,
            title: title.into(),
            content: content.into(),
            authors: None,
            date: None,
            pdf_options: None,
            resources: Vec::new(),
            public: false,
            group: None,
        }
    }
}

/// Input for [`get`](super::get). Content and PDF options are only read when asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GetDocument {
    pub id: DocumentId,
    #[serde(default)]
    pub get_content: bool,
    #[serde(default)]
    pub get_pdf_options: bool,
}

impl GetDocument {
    /// Metadata only.
    pub fn new(id: DocumentId) -> Self {
        Self {
            id,
            get_content: false,
            get_pdf_options: false,
        }
    }

    pub fn with_content(mut self) -> Self {
        self.get_content = true;
        self
    }

    pub fn with_pdf_options(mut self) -> Self {
        self.get_pdf_options = true;
        self
    }
}

/// Input for [`update`](super::update). Only present fields are written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateDocument {
    pub id: DocumentId,
    pub title: Option<String>,
    pub content: Option<String>,
    pub authors: Option<String>,
    pub date: Option<String>,
    pub pdf_options: Option<PdfOptions>,
    pub public: Option<bool>,
    pub group: Option<GroupId>,
}

impl UpdateDocument {
    pub fn new(id: DocumentId) -> Self {
        Self {
            id,
            title: None,
            content: None,
            authors: None,
            date: None,
            pdf_options: None,
            public: None,
            group: None,
        }
    }
}

/// A stored document. `content` and `pdf_options` are `None` unless requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub content: Option<String>,
    pub authors: Option<String>,
    pub date: Option<String>,
    pub owner: AccountId,
    pub group: Option<GroupId>,
    pub public: bool,
    pub pdf_options: Option<PdfOptions>,
}

/// Row as selected; the optional projections fall back to `None` when not selected.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DocumentRow {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) authors: Option<String>,
    pub(crate) date: Option<String>,
    pub(crate) owner: i64,
    pub(crate) group_id: Option<i64>,
    pub(crate) public: bool,
    #[sqlx(default)]
    pub(crate) content: Option<String>,
    #[sqlx(default)]
    pub(crate) pdf_options: Option<String>,
}

impl DocumentRow {
    pub(crate) fn into_document(self) -> Result<Document> {
        let pdf_options = self
            .pdf_options
            .as_deref()
            .map(PdfOptions::from_column)
            .transpose()?;
        Ok(Document {
            id: DocumentId(self.id),
            title: self.title,
            content: self.content,
            authors: self.authors,
            date: self.date,
            owner: AccountId(self.owner),
            group: self.group_id.map(GroupId),
            public: self.public,
            pdf_options,
        })
    }
}
