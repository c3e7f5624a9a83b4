//! Transaction store abstraction consumed by the recalculator.

use crate::domain::{Decimal, RecalcScope, SubaccountId, Transaction, TransactionId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryTransactionStore;

/// A single `balance` rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceUpdate {
    pub transaction_id: TransactionId,
    pub new_balance: Decimal,
}

/// Read/write access to stored transactions.
///
/// Reads are administrative: no per-owner access filtering is applied.
#[async_trait]
pub trait TransactionStore: Send + Sync + fmt::Debug {
    /// Fetch every transaction in scope, in no particular order.
    ///
    /// `RecalcScope::All` is a full unfiltered read.
    async fn fetch_transactions(&self, scope: &RecalcScope)
        -> Result<Vec<Transaction>, StoreError>;

    /// Rewrite the `balance` column for a batch of transactions of one sub-account.
    ///
    /// Implementations apply the batch all-or-nothing. Nothing other than
    /// `balance` may change.
    async fn update_balances(
        &self,
        subaccount_id: &SubaccountId,
        updates: &[BalanceUpdate],
    ) -> Result<(), StoreError>;
}

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error("Transaction store unavailable: {0}")]
    Unavailable(String),
    #[error("Balance write failed for sub-account {subaccount_id}: {message}")]
    Write {
        subaccount_id: SubaccountId,
        message: String,
    },
    #[error("Unknown transaction {0}")]
    UnknownTransaction(TransactionId),
}
