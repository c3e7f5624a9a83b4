//! Which sub-accounts a recalculation covers.

use super::SubaccountId;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecalcScope {
    /// Every sub-account in the store.
    #[default]
    All,
    /// Only the listed sub-accounts. Listed ids with no rows still get a report entry.
    Subaccounts(BTreeSet<SubaccountId>),
}

impl RecalcScope {
    pub fn subaccounts<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RecalcScope::Subaccounts(ids.into_iter().map(SubaccountId::new).collect())
    }

    pub fn contains(&self, subaccount_id: &SubaccountId) -> bool {
        match self {
            RecalcScope::All => true,
            RecalcScope::Subaccounts(ids) => ids.contains(subaccount_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_contains() {
        let scope = RecalcScope::subaccounts(["a", "b"]);
        assert!(scope.contains(&SubaccountId::new("a")));
        assert!(!scope.contains(&SubaccountId::new("c")));
        assert!(RecalcScope::All.contains(&SubaccountId::new("c")));
    }
}
