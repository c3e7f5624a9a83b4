//! Recalculation report returned to callers.

use super::RecalcMode;
use crate::domain::{Decimal, SubaccountId, TransactionId};
use crate::engine::{BalanceCorrection, DriftFinding, GroupAudit};
use serde::Serialize;

/// A correction that could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceFailure {
    pub transaction_id: TransactionId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubaccountReport {
    pub subaccount_id: SubaccountId,
    pub transaction_count: usize,
    /// Running balance after the last transaction.
    pub closing_balance: Decimal,
    pub drift_findings: Vec<DriftFinding>,
    /// Corrections that were written. Always empty in report mode.
    pub corrections: Vec<BalanceCorrection>,
    pub persistence_failures: Vec<PersistenceFailure>,
}

impl SubaccountReport {
    /// Report for an audited group before any write was attempted.
    pub fn from_audit(audit: GroupAudit) -> (Self, Vec<BalanceCorrection>) {
        let report = Self {
            subaccount_id: audit.subaccount_id,
            transaction_count: audit.transaction_count,
            closing_balance: audit.closing_balance,
            drift_findings: audit.findings,
            corrections: Vec::new(),
            persistence_failures: Vec::new(),
        };
        (report, audit.corrections)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationReport {
    pub mode: RecalcMode,
    pub tolerance: Decimal,
    /// Sorted by sub-account id.
    pub per_subaccount: Vec<SubaccountReport>,
    /// True when at least one balance was rewritten; cached views are stale.
    pub corrections_applied: bool,
}

impl RecalculationReport {
    pub fn subaccount(&self, subaccount_id: &str) -> Option<&SubaccountReport> {
        self.per_subaccount
            .iter()
            .find(|r| r.subaccount_id.as_str() == subaccount_id)
    }

    /// All findings, in sub-account then ledger order.
    pub fn drift_findings(&self) -> impl Iterator<Item = &DriftFinding> {
        self.per_subaccount.iter().flat_map(|r| r.drift_findings.iter())
    }

    pub fn persistence_failures(&self) -> impl Iterator<Item = &PersistenceFailure> {
        self.per_subaccount
            .iter()
            .flat_map(|r| r.persistence_failures.iter())
    }

    pub fn transaction_count(&self) -> usize {
        self.per_subaccount.iter().map(|r| r.transaction_count).sum()
    }

    pub fn correction_count(&self) -> usize {
        self.per_subaccount.iter().map(|r| r.corrections.len()).sum()
    }
}
