//! Infrastructure layer: storage adapters implementing the ledger's
//! persistence port.

pub mod store;

pub use store::{InMemoryLedgerStore, PostgresLedgerStore};
