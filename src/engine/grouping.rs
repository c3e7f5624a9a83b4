//! Partition a flat transaction read into per-sub-account groups.

use crate::domain::{RecalcScope, SubaccountId, Transaction};
use std::collections::BTreeMap;

/// Group transactions by sub-account.
///
/// Uses BTreeMap so groups iterate in sub-account order. Every id named by an
/// explicit scope gets a group, possibly empty; rows outside the scope are dropped.
pub fn partition_by_subaccount(
    transactions: Vec<Transaction>,
    scope: &RecalcScope,
) -> BTreeMap<SubaccountId, Vec<Transaction>> {
    let mut groups: BTreeMap<SubaccountId, Vec<Transaction>> = BTreeMap::new();

    if let RecalcScope::Subaccounts(ids) = scope {
        for id in ids {
            groups.insert(id.clone(), Vec::new());
        }
    }

    for tx in transactions {
        if !scope.contains(&tx.subaccount_id) {
            continue;
        }
        groups.entry(tx.subaccount_id.clone()).or_default().push(tx);
    }

    groups
}
