//! Pure computation engine for deterministic ledger logic.

use crate::domain::{Decimal, SubaccountId, TimeMs, TransactionId};
use serde::Serialize;

pub mod grouping;
pub mod ledger;

pub use grouping::partition_by_subaccount;
pub use ledger::{walk_group, LedgerWalker};

/// A stored balance that disagrees with the recomputed running balance,
/// or a row whose amount could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftFinding {
    pub subaccount_id: SubaccountId,
    pub transaction_id: TransactionId,
    pub started_at: TimeMs,
    /// None when the stored balance itself is unparseable.
    pub stored_balance: Option<Decimal>,
    pub computed_balance: Decimal,
    /// None when either side of the comparison is unusable.
    pub drift: Option<Decimal>,
    pub invalid_amount: bool,
}

/// A balance rewrite, either pending or applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceCorrection {
    pub transaction_id: TransactionId,
    pub previous_balance: Option<Decimal>,
    pub new_balance: Decimal,
}

/// Result of walking one sub-account's ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAudit {
    pub subaccount_id: SubaccountId,
    pub transaction_count: usize,
    pub closing_balance: Decimal,
    pub findings: Vec<DriftFinding>,
    /// Rewrites that would bring stored balances back in line.
    pub corrections: Vec<BalanceCorrection>,
}

impl GroupAudit {
    pub fn empty(subaccount_id: SubaccountId) -> Self {
        Self {
            subaccount_id,
            transaction_count: 0,
            closing_balance: Decimal::zero(),
            findings: Vec::new(),
            corrections: Vec::new(),
        }
    }
}
