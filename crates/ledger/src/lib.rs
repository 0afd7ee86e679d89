//! Ledger engine (double-entry money transfers).
//!
//! Pure domain logic plus the orchestrating engine. Persistence is reached
//! only through the [`store::LedgerStore`] port; no IO or HTTP concerns here.

pub mod account;
pub mod engine;
pub mod entry;
pub mod store;
pub mod transaction;

pub use account::{
    Account, BalanceType, Currency, HeaderCategory, SYSTEM_CASH_ACCOUNT, system_accounts,
};
pub use engine::{AccountCreationInput, AccountInformation, LedgerEngine, TransferInput};
pub use entry::{AccountEntry, validate_amount};
pub use store::LedgerStore;
pub use transaction::Transaction;
