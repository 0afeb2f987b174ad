//! Best-effort checks.
//!
//! Existence and role checks are advisory: a storage failure reads as "no"
//! instead of escaping to the caller. The swallowed error is still logged.

use crate::Result;

/// Collapse a fallible check into its answer, treating any failure as `false`.
pub(crate) trait AdvisoryExt {
    fn or_false(self, check: &'static str) -> bool;
}

impl AdvisoryExt for Result<bool> {
    fn or_false(self, check: &'static str) -> bool {
        match self {
            Ok(answer) => answer,
            Err(e) => {
                tracing::debug!(check, error = %e, "Advisory check failed, assuming false");
                false
            }
        }
    }
}
