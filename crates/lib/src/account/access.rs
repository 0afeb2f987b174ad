//! Access policies shared by every manager.
//!
//! A policy decides whether a requester may act on something owned by a
//! target account. Clauses are evaluated left to right and stop at the first
//! one that grants access; clauses that need storage only run when reached.
//!
//! - **Direct** (mutation): requester is the target, or an admin, or the
//!   override holds.
//! - **Visibility** (read): requester is the target, or the resource is
//!   public, or the requester is a recorded friend of the target, or an
//!   admin, or the override holds.

use std::future::{Future, ready};

use super::{AccountError, AccountId, is_admin};
use crate::friend::{self, FriendPair};
use crate::{Database, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PolicyKind {
    Direct,
    Visibility { public: bool },
}

/// An authorisation question: may `requester` act on what `target` owns?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    requester: Option<AccountId>,
    target: AccountId,
    kind: PolicyKind,
}

impl AccessPolicy {
    /// Mutation access: owner or admin.
    pub fn direct(requester: impl Into<Option<AccountId>>, target: AccountId) -> Self {
        Self {
            requester: requester.into(),
            target,
            kind: PolicyKind::Direct,
        }
    }

    /// Read access: owner, public resource, friend of the owner, or admin.
    pub fn visibility(
        requester: impl Into<Option<AccountId>>,
        target: AccountId,
        public: bool,
    ) -> Self {
        Self {
            requester: requester.into(),
            target,
            kind: PolicyKind::Visibility { public },
        }
    }

    /// Fail with [`AccountError::NoAccess`] unless the policy grants access.
    pub async fn check(&self, database: &Database) -> Result<()> {
        self.check_or(database, ready(false)).await
    }

    /// Like [`check`](Self::check), with `other` as the final clause.
    ///
    /// `other` is only awaited when every earlier clause denied access.
    pub async fn check_or<F>(&self, database: &Database, other: F) -> Result<()>
    where
        F: Future<Output = bool>,
    {
        if self.allows_or(database, other).await {
            Ok(())
        } else {
            tracing::debug!(
                requester = ?self.requester,
                target = %self.target,
                kind = ?self.kind,
                "Access denied"
            );
            Err(AccountError::NoAccess {
                requester: self.requester,
                target: self.target,
            }
            .into())
        }
    }

    /// Evaluate the policy without failing.
    pub async fn allows(&self, database: &Database) -> bool {
        self.allows_or(database, ready(false)).await
    }

    /// Evaluate the policy with `other` as the final clause.
    pub async fn allows_or<F>(&self, database: &Database, other: F) -> bool
    where
        F: Future<Output = bool>,
    {
        if self.requester == Some(self.target) {
            return true;
        }
        if let PolicyKind::Visibility { public } = self.kind {
            if public {
                return true;
            }
            if let Some(requester) = self.requester {
                let pair = FriendPair {
                    account: self.target,
                    friend: requester,
                };
                if friend::exists_account_and_friend_account(database, pair).await {
                    return true;
                }
            }
        }
        if is_admin(database, self.requester).await {
            return true;
        }
        other.await
    }
}
