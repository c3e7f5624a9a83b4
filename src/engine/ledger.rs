use crate::domain::{sort_transactions_deterministic, Amount, Decimal, SubaccountId, Transaction};

use super::{BalanceCorrection, DriftFinding, GroupAudit};

/// Running-balance fold over one sub-account.
///
/// Holds the only accumulator for its group. Callers must feed transactions
/// in `(started_at, id)` order; `walk_group` does the sorting.
pub struct LedgerWalker {
    subaccount_id: SubaccountId,
    tolerance: Decimal,
    running_balance: Decimal,
    transaction_count: usize,

    // Outputs accumulated during processing.
    findings: Vec<DriftFinding>,
    corrections: Vec<BalanceCorrection>,
}

impl LedgerWalker {
    pub fn new(subaccount_id: SubaccountId, tolerance: Decimal) -> Self {
        Self {
            subaccount_id,
            tolerance,
            running_balance: Decimal::zero(),
            transaction_count: 0,
            findings: Vec::new(),
            corrections: Vec::new(),
        }
    }

    pub fn running_balance(&self) -> Decimal {
        self.running_balance
    }

    /// Advance the running balance by one transaction and audit its stored balance.
    pub fn process_transaction(&mut self, tx: &Transaction) {
        debug_assert_eq!(tx.subaccount_id, self.subaccount_id);
        self.transaction_count += 1;

        let Some(amount) = tx.amount.value() else {
            self.record_invalid_amount(tx, "Transaction amount is not a finite decimal");
            return;
        };

        let Some(next) = self.running_balance.checked_add(amount) else {
            self.record_invalid_amount(tx, "Transaction amount overflows the running balance");
            return;
        };
        self.running_balance = next;

        match &tx.balance {
            Amount::Value(stored) => match stored.abs_diff(self.running_balance) {
                Some(drift) if drift > self.tolerance => {
                    self.record_drift(tx, Some(*stored), Some(drift));
                }
                Some(_) => {}
                // Difference is beyond the representable range.
                None => self.record_drift(tx, Some(*stored), None),
            },
            Amount::Invalid { .. } => self.record_drift(tx, None, None),
        }
    }

    /// Unusable amount: contributes zero and is reported, never corrected.
    fn record_invalid_amount(&mut self, tx: &Transaction, reason: &str) {
        tracing::warn!(
            subaccount = %self.subaccount_id,
            transaction = %tx.id,
            amount = %tx.amount,
            reason,
            "Skipping transaction amount, treating as zero"
        );
        self.findings.push(DriftFinding {
            subaccount_id: self.subaccount_id.clone(),
            transaction_id: tx.id.clone(),
            started_at: tx.started_at,
            stored_balance: tx.balance.value(),
            computed_balance: self.running_balance,
            drift: None,
            invalid_amount: true,
        });
    }

    fn record_drift(&mut self, tx: &Transaction, stored: Option<Decimal>, drift: Option<Decimal>) {
        tracing::debug!(
            subaccount = %self.subaccount_id,
            transaction = %tx.id,
            stored = %tx.balance,
            computed = %self.running_balance,
            "Balance drift"
        );
        self.findings.push(DriftFinding {
            subaccount_id: self.subaccount_id.clone(),
            transaction_id: tx.id.clone(),
            started_at: tx.started_at,
            stored_balance: stored,
            computed_balance: self.running_balance,
            drift,
            invalid_amount: false,
        });
        self.corrections.push(BalanceCorrection {
            transaction_id: tx.id.clone(),
            previous_balance: stored,
            new_balance: self.running_balance,
        });
    }

    pub fn finish(self) -> GroupAudit {
        GroupAudit {
            subaccount_id: self.subaccount_id,
            transaction_count: self.transaction_count,
            closing_balance: self.running_balance,
            findings: self.findings,
            corrections: self.corrections,
        }
    }
}

/// Sort one sub-account's transactions and fold them into a `GroupAudit`.
pub fn walk_group(
    subaccount_id: SubaccountId,
    mut transactions: Vec<Transaction>,
    tolerance: Decimal,
) -> GroupAudit {
    sort_transactions_deterministic(&mut transactions);

    let mut walker = LedgerWalker::new(subaccount_id, tolerance);
    for tx in &transactions {
        walker.process_transaction(tx);
    }
    walker.finish()
}
