//! Error types for the account manager
use thiserror::Error;

use super::types::{AccountId, NAME_FORMAT_INFO, PASSWORD_FORMAT_INFO};
use crate::crypto::CryptoError;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Account name already exists: {name}")]
    NameAlreadyExists { name: String },

    #[error("Invalid account name format '{name}': {}", NAME_FORMAT_INFO)]
    InvalidNameFormat { name: String },

    #[error("Invalid password format: {}", PASSWORD_FORMAT_INFO)]
    InvalidPasswordFormat,

    #[error("Account not found: {id}")]
    NotExisting { id: AccountId },

    #[error("Account not found: {name}")]
    NameNotExisting { name: String },

    #[error("No access to account {target}")]
    NoAccess {
        requester: Option<AccountId>,
        target: AccountId,
    },

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl AccountError {
    /// Check if this error is a rejected name or password format.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AccountError::InvalidNameFormat { .. } | AccountError::InvalidPasswordFormat
        )
    }

    /// Check if this error indicates the account name is taken.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, AccountError::NameAlreadyExists { .. })
    }

    /// Check if this error indicates the account was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AccountError::NotExisting { .. } | AccountError::NameNotExisting { .. }
        )
    }

    /// Check if this error indicates an access policy rejected the requester.
    pub fn is_no_access(&self) -> bool {
        matches!(self, AccountError::NoAccess { .. })
    }
}

impl From<AccountError> for crate::Error {
    fn from(err: AccountError) -> Self {
        crate::Error::Account(err)
    }
}

impl From<CryptoError> for crate::Error {
    fn from(err: CryptoError) -> Self {
        crate::Error::Account(AccountError::Crypto(err))
    }
}
