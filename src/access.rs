//! Administrator allow-list.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Which callers may run administrative operations.
///
/// Administrative operations are registering employees, listing them,
/// changing their rates and changing the global base salary.
///
/// # Example
///
/// ```
/// use shift_ledger::access::AccessPolicy;
///
/// let policy = AccessPolicy::new([42]);
/// assert!(policy.require_admin(42).is_ok());
/// assert!(policy.require_admin(7).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Identifiers with administrator rights.
    #[serde(default)]
    pub admin_ids: BTreeSet<i64>,
}

impl AccessPolicy {
    /// Creates a policy from a list of administrator identifiers.
    pub fn new(admin_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            admin_ids: admin_ids.into_iter().collect(),
        }
    }

    /// Returns true if `user_id` is an administrator.
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }

    /// Fails with [`EngineError::Unauthorized`] unless `user_id` is an administrator.
    pub fn require_admin(&self, user_id: i64) -> EngineResult<()> {
        if self.is_admin(user_id) {
            Ok(())
        } else {
            Err(EngineError::Unauthorized { user_id })
        }
    }
}
