//! Error types for the document manager.

use thiserror::Error;

use super::DocumentId;
use crate::account::AccountId;
use crate::group::GroupId;

/// Status hint attached to a forbidden document action.
pub const FORBIDDEN_STATUS: u16 = 403;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Document owner account not found: {id}")]
    AccountNotExisting { id: AccountId },

    #[error("Document group not found: {id}")]
    GroupNotExisting { id: GroupId },

    #[error("Document not found: {id}")]
    NotExisting { id: DocumentId },

    /// The requester may not act on behalf of `owner`.
    #[error("Account {requester} may not create documents for account {owner}")]
    Forbidden {
        requester: AccountId,
        owner: AccountId,
    },
}

impl DocumentError {
    /// Check if this error indicates a document, owner or group was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DocumentError::AccountNotExisting { .. }
                | DocumentError::GroupNotExisting { .. }
                | DocumentError::NotExisting { .. }
        )
    }

    /// Check if this error is a forbidden action.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, DocumentError::Forbidden { .. })
    }

    /// HTTP-style status hint, if this error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DocumentError::Forbidden { .. } => Some(FORBIDDEN_STATUS),
            _ => None,
        }
    }
}

impl From<DocumentError> for crate::Error {
    fn from(err: DocumentError) -> Self {
        crate::Error::Document(err)
    }
}
