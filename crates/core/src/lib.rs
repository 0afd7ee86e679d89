//! `sambaza-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, shared record metadata, and the ledger error taxonomy.

pub mod error;
pub mod id;
pub mod record;

pub use error::{LedgerError, LedgerResult};
pub use id::{AccountId, EntryId, TransactionId};
pub use record::RecordMeta;
