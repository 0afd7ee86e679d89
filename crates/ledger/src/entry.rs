//! Account entries and the amount validator applied to each leg.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sambaza_core::{AccountId, EntryId, LedgerError, LedgerResult, RecordMeta, TransactionId};

/// Check that a monetary value is strictly positive.
///
/// Applied independently to the debit leg and the credit leg of every
/// prospective entry pair before anything is persisted. No side effects.
pub fn validate_amount(value: Decimal) -> LedgerResult<()> {
    if value <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(format!(
            "you can not post a zero or negative amount ({value})"
        )));
    }
    Ok(())
}

/// One leg of a recorded transaction.
///
/// Exactly one of `debit_amount` / `credit_amount` is meaningful; the other
/// stays zero. An entry belongs to exactly one account and, once recorded,
/// exactly one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    pub id: EntryId,
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
    pub effective_date: DateTime<Utc>,
    pub account_id: AccountId,
    /// Stamped by the transaction recorder at persist time.
    pub transaction_id: Option<TransactionId>,
}

impl AccountEntry {
    /// A debit leg against `account_id`.
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self::leg(account_id, amount, Decimal::ZERO)
    }

    /// A credit leg against `account_id`.
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self::leg(account_id, Decimal::ZERO, amount)
    }

    fn leg(account_id: AccountId, debit_amount: Decimal, credit_amount: Decimal) -> Self {
        Self {
            id: EntryId::new(),
            meta: RecordMeta::new(),
            debit_amount,
            credit_amount,
            effective_date: Utc::now(),
            account_id,
            transaction_id: None,
        }
    }

    /// Validate the debit leg's amount.
    pub fn validate_debit_amount(&self) -> LedgerResult<()> {
        validate_amount(self.debit_amount)
            .map_err(|_| LedgerError::invalid_amount("you can not debit a 0 or a negative amount"))
    }

    /// Validate the credit leg's amount.
    pub fn validate_credit_amount(&self) -> LedgerResult<()> {
        validate_amount(self.credit_amount)
            .map_err(|_| LedgerError::invalid_amount("you can not credit a 0 or a negative amount"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn positive_amounts_pass() {
        assert!(validate_amount(dec!(0.01)).is_ok());
        assert!(validate_amount(dec!(100)).is_ok());
    }

    #[test]
    fn zero_and_negative_amounts_fail() {
        assert!(matches!(
            validate_amount(Decimal::ZERO),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            validate_amount(dec!(-100)),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn legs_keep_the_other_side_zero() {
        let account = AccountId::new();

        let dr = AccountEntry::debit(account, dec!(80));
        assert_eq!(dr.debit_amount, dec!(80));
        assert_eq!(dr.credit_amount, Decimal::ZERO);
        assert!(dr.transaction_id.is_none());

        let cr = AccountEntry::credit(account, dec!(80));
        assert_eq!(cr.credit_amount, dec!(80));
        assert_eq!(cr.debit_amount, Decimal::ZERO);
    }

    #[test]
    fn leg_validation_checks_the_relevant_side() {
        let account = AccountId::new();
        assert!(AccountEntry::debit(account, dec!(10)).validate_debit_amount().is_ok());
        assert!(AccountEntry::debit(account, dec!(10)).validate_credit_amount().is_err());
        assert!(AccountEntry::credit(account, dec!(-1)).validate_credit_amount().is_err());
    }
}
