//! Ledger error model.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::id::AccountId;

/// Result type used across the ledger domain.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Every variant carries a human-readable message and is recovered at the
/// engine boundary; none is process-fatal except the missing-system-account
/// condition checked once at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A monetary value was missing, zero or negative.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A required entry leg was not supplied.
    #[error("missing entry: {0}")]
    MissingEntry(String),

    /// A required account reference was absent or unusable.
    #[error("missing account: {0}")]
    MissingAccount(String),

    /// The debit leg does not equal the credit leg.
    #[error("transaction does not observe double entry: debit {debit} != credit {credit}")]
    UnbalancedTransaction { debit: Decimal, credit: Decimal },

    /// A non-system source account lacks the balance for a transfer.
    #[error("{amount} is more than {account_name} current account's balance of {balance}")]
    InsufficientFunds {
        amount: Decimal,
        balance: Decimal,
        account_name: String,
    },

    /// An account id did not resolve to a stored account.
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// The source account's header category has no transfer rule.
    #[error("transfers out of {0} accounts are not supported")]
    UnsupportedHeaderCategory(String),

    /// Storage-layer failure, including constraint violations.
    #[error("storage failure: {0}")]
    Persistence(String),
}

impl LedgerError {
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn missing_entry(msg: impl Into<String>) -> Self {
        Self::MissingEntry(msg.into())
    }

    pub fn missing_account(msg: impl Into<String>) -> Self {
        Self::MissingAccount(msg.into())
    }

    pub fn unsupported_header(category: impl Into<String>) -> Self {
        Self::UnsupportedHeaderCategory(category.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}
