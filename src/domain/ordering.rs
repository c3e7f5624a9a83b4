//! Stable transaction ordering for deterministic ledger walks.

use crate::domain::{TimeMs, Transaction, TransactionId};

/// Stable ordering key for transactions within a sub-account.
///
/// Ordering: started_at -> id (byte-wise). Store row order never matters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TransactionOrderingKey<'a> {
    /// Start timestamp (primary sort).
    pub started_at: TimeMs,
    /// Transaction id (tie-break).
    pub id: &'a TransactionId,
}

impl<'a> TransactionOrderingKey<'a> {
    pub fn from_transaction(tx: &'a Transaction) -> Self {
        TransactionOrderingKey {
            started_at: tx.started_at,
            id: &tx.id,
        }
    }
}

/// Sort transactions deterministically.
pub fn sort_transactions_deterministic(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        TransactionOrderingKey::from_transaction(a).cmp(&TransactionOrderingKey::from_transaction(b))
    });
}
