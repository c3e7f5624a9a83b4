pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod notify;
pub mod recalc;
pub mod store;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{Amount, Decimal, RecalcScope, SubaccountId, TimeMs, Transaction, TransactionId};
pub use error::AppError;
pub use notify::{BroadcastNotifier, ChangeNotifier, TracingNotifier};
pub use recalc::{RecalcError, RecalcMode, RecalcOptions, RecalculationReport, Recalculator};
pub use store::{MemoryTransactionStore, StoreError, TransactionStore};
