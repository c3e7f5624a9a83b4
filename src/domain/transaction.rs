//! Transaction row as seen by the recalculator.

use super::{Amount, Decimal, SubaccountId, TimeMs, TransactionId};

/// A ledger transaction.
///
/// Only `balance` is ever written back by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub subaccount_id: SubaccountId,
    /// Primary ordering key.
    pub started_at: TimeMs,
    /// Signed ledger delta.
    pub amount: Amount,
    /// Stored running balance as of this transaction.
    pub balance: Amount,
}

impl Transaction {
    pub fn new(
        id: TransactionId,
        subaccount_id: SubaccountId,
        started_at: TimeMs,
        amount: Amount,
        balance: Amount,
    ) -> Self {
        Self {
            id,
            subaccount_id,
            started_at,
            amount,
            balance,
        }
    }

    /// Convenience constructor for well-formed rows.
    pub fn with_values(
        id: &str,
        subaccount_id: &str,
        started_at_ms: i64,
        amount: Decimal,
        balance: Decimal,
    ) -> Self {
        Self::new(
            TransactionId::new(id),
            SubaccountId::new(subaccount_id),
            TimeMs::new(started_at_ms),
            Amount::Value(amount),
            Amount::Value(balance),
        )
    }
}
