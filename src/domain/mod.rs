//! Domain types and determinism layer for the ledger recalculator.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Amount, which keeps unparseable stored values instead of failing the read
//! - Identifiers and timestamps: TimeMs, TransactionId, SubaccountId
//! - The (started_at, id) ordering key

pub mod amount;
pub mod decimal;
pub mod ordering;
pub mod primitives;
pub mod scope;
pub mod transaction;

pub use amount::Amount;
pub use decimal::Decimal;
pub use ordering::{sort_transactions_deterministic, TransactionOrderingKey};
pub use primitives::{SubaccountId, TimeMs, TransactionId};
pub use scope::RecalcScope;
pub use transaction::Transaction;
