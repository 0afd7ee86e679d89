//! Shared record metadata embedded by every persisted entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle fields common to accounts, transactions and entries.
///
/// Embedded by composition rather than inherited. `deleted_at` is reserved
/// for soft deletion and is never set by business logic: accounts are only
/// deactivated (`active = false`), transactions and entries are immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl RecordMeta {
    /// Metadata for a record created now: active, undeleted.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Metadata with an explicit creation instant (rehydration from storage).
    pub fn at(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            active: true,
            created_at,
            updated_at,
            deleted_at: None,
        }
    }
}

impl Default for RecordMeta {
    fn default() -> Self {
        Self::new()
    }
}
