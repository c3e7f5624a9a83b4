//! Ledger balance recalculation: fetch, group, fold, audit, optionally correct.

use crate::domain::Decimal;
use crate::store::StoreError;
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod recalculator;
pub mod report;

pub use recalculator::Recalculator;
pub use report::{PersistenceFailure, RecalculationReport, SubaccountReport};

/// Groups processed at once when no concurrency is configured.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default drift tolerance: 0.0001.
pub fn default_tolerance() -> Decimal {
    Decimal::new(RustDecimal::new(1, 4))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecalcMode {
    /// Read-only audit.
    #[default]
    Report,
    /// Write recomputed balances back where drift exceeds tolerance.
    Correct,
}

impl std::fmt::Display for RecalcMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecalcMode::Report => write!(f, "report"),
            RecalcMode::Correct => write!(f, "correct"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecalcOptions {
    pub mode: RecalcMode,
    /// Largest |stored - computed| still considered in agreement.
    pub tolerance: Decimal,
}

impl RecalcOptions {
    pub fn report() -> Self {
        Self {
            mode: RecalcMode::Report,
            tolerance: default_tolerance(),
        }
    }

    pub fn correct() -> Self {
        Self {
            mode: RecalcMode::Correct,
            tolerance: default_tolerance(),
        }
    }

    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn validate(&self) -> Result<(), RecalcError> {
        if self.tolerance.is_negative() {
            return Err(RecalcError::InvalidOptions(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

impl Default for RecalcOptions {
    fn default() -> Self {
        Self::report()
    }
}

#[derive(Debug, Error)]
pub enum RecalcError {
    /// The bulk read failed; nothing was reported or written.
    #[error("Failed to fetch transactions: {0}")]
    Fetch(#[source] StoreError),
    #[error("Invalid recalculation options: {0}")]
    InvalidOptions(String),
}
