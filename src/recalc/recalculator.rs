use super::{
    PersistenceFailure, RecalcError, RecalcMode, RecalcOptions, RecalculationReport,
    SubaccountReport, DEFAULT_CONCURRENCY,
};
use crate::domain::{RecalcScope, SubaccountId, Transaction};
use crate::engine::{partition_by_subaccount, walk_group};
use crate::store::{BalanceUpdate, TransactionStore};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Recomputes running balances for every sub-account in scope.
///
/// Stateless between runs: each call re-reads the store and starts every
/// group from zero, so repeating a run converges on the same result.
#[derive(Clone)]
pub struct Recalculator {
    store: Arc<dyn TransactionStore>,
    concurrency: usize,
}

impl Recalculator {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self {
            store,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Maximum number of sub-accounts in flight at once (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Audit (and in correction mode, repair) stored running balances.
    ///
    /// # Errors
    /// `RecalcError::Fetch` if the store cannot be read; nothing is written
    /// in that case. Write failures do not abort the run, they are listed
    /// per transaction in the report.
    pub async fn recalculate(
        &self,
        scope: &RecalcScope,
        options: &RecalcOptions,
    ) -> Result<RecalculationReport, RecalcError> {
        options.validate()?;

        let transactions = self
            .store
            .fetch_transactions(scope)
            .await
            .map_err(RecalcError::Fetch)?;
        let fetched = transactions.len();

        let groups = partition_by_subaccount(transactions, scope);
        info!(
            mode = %options.mode,
            tolerance = %options.tolerance,
            transactions = fetched,
            subaccounts = groups.len(),
            "Starting ledger recalculation"
        );

        let mut per_subaccount: Vec<SubaccountReport> = stream::iter(groups)
            .map(|(subaccount_id, group)| self.process_group(subaccount_id, group, options))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        per_subaccount.sort_by(|a, b| a.subaccount_id.cmp(&b.subaccount_id));

        let report = RecalculationReport {
            mode: options.mode,
            tolerance: options.tolerance,
            corrections_applied: per_subaccount.iter().any(|r| !r.corrections.is_empty()),
            per_subaccount,
        };

        info!(
            transactions = report.transaction_count(),
            findings = report.drift_findings().count(),
            corrections = report.correction_count(),
            persistence_failures = report.persistence_failures().count(),
            "Ledger recalculation finished"
        );

        Ok(report)
    }

    async fn process_group(
        &self,
        subaccount_id: SubaccountId,
        transactions: Vec<Transaction>,
        options: &RecalcOptions,
    ) -> SubaccountReport {
        let audit = walk_group(subaccount_id, transactions, options.tolerance);
        let (mut report, pending) = SubaccountReport::from_audit(audit);

        if !report.drift_findings.is_empty() {
            warn!(
                subaccount = %report.subaccount_id,
                findings = report.drift_findings.len(),
                closing_balance = %report.closing_balance,
                "Stored balances drift from recomputed ledger"
            );
        }

        if options.mode != RecalcMode::Correct || pending.is_empty() {
            return report;
        }

        let updates: Vec<BalanceUpdate> = pending
            .iter()
            .map(|c| BalanceUpdate {
                transaction_id: c.transaction_id.clone(),
                new_balance: c.new_balance,
            })
            .collect();

        match self
            .store
            .update_balances(&report.subaccount_id, &updates)
            .await
        {
            Ok(()) => {
                debug!(
                    subaccount = %report.subaccount_id,
                    corrections = pending.len(),
                    "Applied balance corrections"
                );
                report.corrections = pending;
            }
            Err(e) => {
                warn!(
                    subaccount = %report.subaccount_id,
                    error = %e,
                    "Balance corrections not applied"
                );
                let message = e.to_string();
                report.persistence_failures = pending
                    .into_iter()
                    .map(|c| PersistenceFailure {
                        transaction_id: c.transaction_id,
                        message: message.clone(),
                    })
                    .collect();
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, Decimal, TimeMs, TransactionId};
    use crate::store::MemoryTransactionStore;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tx(id: &str, subaccount: &str, at: i64, amount: &str, balance: &str) -> Transaction {
        Transaction::new(
            TransactionId::new(id),
            SubaccountId::new(subaccount),
            TimeMs::new(at),
            Amount::parse(amount),
            Amount::parse(balance),
        )
    }

    #[tokio::test]
    async fn test_report_mode_is_read_only() {
        let store = Arc::new(
            MemoryTransactionStore::new().with_transaction(tx("t1", "a", 1, "100", "90")),
        );
        let recalculator = Recalculator::new(store.clone());

        let report = recalculator
            .recalculate(&RecalcScope::All, &RecalcOptions::report())
            .await
            .unwrap();

        assert_eq!(report.drift_findings().count(), 1);
        assert!(!report.corrections_applied);
        assert_eq!(report.correction_count(), 0);
        assert_eq!(store.write_batches(), 0);
        assert_eq!(store.balance_of("t1").await, Some(Amount::Value(dec("90"))));
    }

    #[tokio::test]
    async fn test_correct_mode_writes_only_drifted_rows() {
        let store = Arc::new(MemoryTransactionStore::new().with_transactions(vec![
            tx("t1", "a", 1, "100", "100"),
            tx("t2", "a", 2, "-30", "75"),
            tx("t3", "a", 3, "10", "80"),
        ]));
        let recalculator = Recalculator::new(store.clone());

        let report = recalculator
            .recalculate(&RecalcScope::All, &RecalcOptions::correct())
            .await
            .unwrap();

        assert!(report.corrections_applied);
        let sub = report.subaccount("a").unwrap();
        let corrected: Vec<&str> = sub
            .corrections
            .iter()
            .map(|c| c.transaction_id.as_str())
            .collect();
        assert_eq!(corrected, vec!["t2"]);
        assert_eq!(store.balance_of("t2").await, Some(Amount::Value(dec("70"))));
        assert_eq!(store.write_batches(), 1);
    }

    #[tokio::test]
    async fn test_no_write_when_nothing_drifts() {
        let store = Arc::new(
            MemoryTransactionStore::new().with_transaction(tx("t1", "a", 1, "5", "5")),
        );
        let report = Recalculator::new(store.clone())
            .recalculate(&RecalcScope::All, &RecalcOptions::correct())
            .await
            .unwrap();

        assert!(!report.corrections_applied);
        assert_eq!(store.write_batches(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts() {
        let store = Arc::new(MemoryTransactionStore::new().fail_fetch());
        let result = Recalculator::new(store)
            .recalculate(&RecalcScope::All, &RecalcOptions::correct())
            .await;
        assert!(matches!(result, Err(RecalcError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_negative_tolerance_rejected_before_fetch() {
        let store = Arc::new(MemoryTransactionStore::new().fail_fetch());
        let result = Recalculator::new(store)
            .recalculate(
                &RecalcScope::All,
                &RecalcOptions::report().with_tolerance(dec("-0.1")),
            )
            .await;
        assert!(matches!(result, Err(RecalcError::InvalidOptions(_))));
    }

    #[tokio::test]
    async fn test_concurrency_floor() {
        let store = Arc::new(MemoryTransactionStore::new());
        let recalculator = Recalculator::new(store).with_concurrency(0);
        assert_eq!(recalculator.concurrency, 1);
    }
}
