//! Transaction records.

use serde::{Deserialize, Serialize};

use sambaza_core::{RecordMeta, TransactionId};

/// The header of one recorded movement of money.
///
/// Always owns exactly two balancing [`crate::entry::AccountEntry`] rows.
/// Immutable once created: no updates, no deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub description: String,
}

impl Transaction {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: TransactionId::new(),
            meta: RecordMeta::new(),
            description: description.into(),
        }
    }
}
