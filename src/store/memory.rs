//! In-memory transaction store for tests and embedding.

use super::{BalanceUpdate, StoreError, TransactionStore};
use crate::domain::{Amount, RecalcScope, SubaccountId, Transaction, TransactionId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory store with optional fault injection.
///
/// Rows are kept in insertion order so callers can check that results do
/// not depend on it.
#[derive(Debug, Default)]
pub struct MemoryTransactionStore {
    rows: RwLock<Vec<Transaction>>,
    fail_fetch: bool,
    failing_subaccounts: HashSet<SubaccountId>,
    write_batches: AtomicUsize,
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction to the store.
    pub fn with_transaction(mut self, tx: Transaction) -> Self {
        self.rows.get_mut().push(tx);
        self
    }

    /// Add multiple transactions to the store.
    pub fn with_transactions(mut self, txs: Vec<Transaction>) -> Self {
        self.rows.get_mut().extend(txs);
        self
    }

    /// Make every fetch fail.
    pub fn fail_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    /// Make balance writes for one sub-account fail.
    pub fn fail_writes_for(mut self, subaccount_id: &str) -> Self {
        self.failing_subaccounts
            .insert(SubaccountId::new(subaccount_id));
        self
    }

    /// Snapshot of all rows in insertion order.
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.rows.read().await.clone()
    }

    /// Stored balance of a single transaction.
    pub async fn balance_of(&self, id: &str) -> Option<Amount> {
        self.rows
            .read()
            .await
            .iter()
            .find(|t| t.id.as_str() == id)
            .map(|t| t.balance.clone())
    }

    /// Number of successful `update_balances` batches.
    pub fn write_batches(&self) -> usize {
        self.write_batches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn fetch_transactions(
        &self,
        scope: &RecalcScope,
    ) -> Result<Vec<Transaction>, StoreError> {
        if self.fail_fetch {
            return Err(StoreError::Unavailable(
                "injected fetch failure".to_string(),
            ));
        }

        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|t| scope.contains(&t.subaccount_id))
            .cloned()
            .collect())
    }

    async fn update_balances(
        &self,
        subaccount_id: &SubaccountId,
        updates: &[BalanceUpdate],
    ) -> Result<(), StoreError> {
        if self.failing_subaccounts.contains(subaccount_id) {
            return Err(StoreError::Write {
                subaccount_id: subaccount_id.clone(),
                message: "injected write failure".to_string(),
            });
        }

        let mut rows = self.rows.write().await;

        let index: HashMap<TransactionId, usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, t)| &t.subaccount_id == subaccount_id)
            .map(|(position, t)| (t.id.clone(), position))
            .collect();

        // Validate the whole batch before touching anything.
        let positions = updates
            .iter()
            .map(|update| {
                index
                    .get(&update.transaction_id)
                    .copied()
                    .ok_or_else(|| StoreError::UnknownTransaction(update.transaction_id.clone()))
            })
            .collect::<Result<Vec<usize>, StoreError>>()?;

        for (update, position) in updates.iter().zip(positions) {
            rows[position].balance = Amount::Value(update.new_balance);
        }

        self.write_batches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
