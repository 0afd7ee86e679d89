//! Accounts and the classification enums that drive their behavior.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sambaza_core::{AccountId, RecordMeta};

/// Currencies accepted for account transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Kenyan shilling.
    #[serde(rename = "KSH")]
    Ksh,
    /// Ugandan shilling.
    #[serde(rename = "UGX")]
    Ugx,
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Currency::Ksh => "KSH",
            Currency::Ugx => "UGX",
        })
    }
}

/// Normal balance of an account: whether its balance grows with debits
/// or with credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceType {
    #[serde(rename = "DR")]
    Debit,
    #[serde(rename = "CR")]
    Credit,
}

impl BalanceType {
    /// Derive a balance from aggregated entry totals.
    ///
    /// Debit-normal accounts grow with debits, credit-normal accounts with
    /// credits. Aggregation over no entries yields zero on both sides, so a
    /// fresh account balances to zero.
    pub fn balance(self, total_debit: Decimal, total_credit: Decimal) -> Decimal {
        match self {
            BalanceType::Debit => total_debit - total_credit,
            BalanceType::Credit => total_credit - total_debit,
        }
    }
}

impl core::fmt::Display for BalanceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            BalanceType::Debit => "DR",
            BalanceType::Credit => "CR",
        })
    }
}

/// Grouping label for accounts.
///
/// A closed enumeration: each category maps to a normal balance and a
/// transfer-eligibility rule below. Adding a category means extending these
/// two tables, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HeaderCategory {
    /// Customer deposit accounts.
    Deposit,
    /// Customer loan accounts.
    Loan,
    /// System cash/control accounts.
    Cash,
}

impl HeaderCategory {
    /// Category → normal balance.
    pub const fn balance_type(self) -> BalanceType {
        match self {
            HeaderCategory::Deposit => BalanceType::Credit,
            HeaderCategory::Loan => BalanceType::Debit,
            HeaderCategory::Cash => BalanceType::Debit,
        }
    }

    /// Category → whether money may be transferred out of such an account.
    ///
    /// Only depositable categories have an entry-construction rule; a loan
    /// account as a transfer source is rejected explicitly.
    pub const fn supports_outgoing_transfers(self) -> bool {
        match self {
            HeaderCategory::Deposit | HeaderCategory::Cash => true,
            HeaderCategory::Loan => false,
        }
    }
}

impl core::fmt::Display for HeaderCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            HeaderCategory::Deposit => "DEPOSIT",
            HeaderCategory::Loan => "LOAN",
            HeaderCategory::Cash => "CASH",
        })
    }
}

/// A virtual store and tracker of value.
///
/// The balance is never a field: it is always derived from entry history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    pub description: String,
    /// Human-readable number, generated at creation, never user-supplied.
    pub number: String,
    pub currency: Currency,
    pub balance_type: BalanceType,
    pub header: HeaderCategory,
    pub is_system_account: bool,
}

impl Account {
    /// Build a customer account. The number is generated here and the
    /// balance type comes from the header mapping table.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        currency: Currency,
        header: HeaderCategory,
    ) -> Self {
        let id = AccountId::new();
        Self {
            id,
            meta: RecordMeta::new(),
            name: name.into(),
            description: description.into(),
            number: generate_account_number(id),
            currency,
            balance_type: header.balance_type(),
            header,
            is_system_account: false,
        }
    }
}

/// Generate a fresh account number.
///
/// Derived from the time-ordered account id, so numbers sort roughly by
/// creation time and stay unique under rapid creation.
fn generate_account_number(id: AccountId) -> String {
    let hex = id.as_uuid().simple().to_string();
    format!("AC-{}", &hex[..12])
}

/// Fixed identifier of the system's cash account. Seeded at startup; its
/// absence at runtime is a deployment error, not a per-request condition.
pub const SYSTEM_CASH_ACCOUNT: AccountId =
    AccountId::from_u128(0xddff1ec2_edb2_4d8e_90f0_115766cace6b);

/// System control accounts seeded before any customer account exists.
pub fn system_accounts() -> Vec<Account> {
    vec![Account {
        id: SYSTEM_CASH_ACCOUNT,
        meta: RecordMeta::new(),
        name: "Default System's Payment Method account".to_string(),
        description: "Default System's Payment Method account".to_string(),
        number: "AC-0123456789".to_string(),
        currency: Currency::Ksh,
        balance_type: BalanceType::Debit,
        header: HeaderCategory::Cash,
        is_system_account: true,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn header_mapping_table() {
        assert_eq!(HeaderCategory::Deposit.balance_type(), BalanceType::Credit);
        assert_eq!(HeaderCategory::Loan.balance_type(), BalanceType::Debit);
        assert_eq!(HeaderCategory::Cash.balance_type(), BalanceType::Debit);

        assert!(HeaderCategory::Deposit.supports_outgoing_transfers());
        assert!(HeaderCategory::Cash.supports_outgoing_transfers());
        assert!(!HeaderCategory::Loan.supports_outgoing_transfers());
    }

    #[test]
    fn balance_orientation_follows_normal_side() {
        assert_eq!(
            BalanceType::Debit.balance(dec!(100), dec!(30)),
            dec!(70)
        );
        assert_eq!(
            BalanceType::Credit.balance(dec!(30), dec!(100)),
            dec!(70)
        );
    }

    #[test]
    fn empty_totals_balance_to_zero() {
        assert_eq!(
            BalanceType::Credit.balance(Decimal::ZERO, Decimal::ZERO),
            Decimal::ZERO
        );
    }

    #[test]
    fn new_account_gets_a_generated_number_and_mapped_balance_type() {
        let account = Account::new(
            "John Doe DEPOSIT account",
            "John Doe DEPOSIT account",
            Currency::Ksh,
            HeaderCategory::Deposit,
        );
        assert!(account.number.starts_with("AC-"));
        assert_eq!(account.balance_type, BalanceType::Credit);
        assert!(!account.is_system_account);
        assert!(account.meta.active);
    }

    #[test]
    fn system_cash_account_is_exempt_and_debit_normal() {
        let accounts = system_accounts();
        assert_eq!(accounts.len(), 1);
        let cash = &accounts[0];
        assert_eq!(cash.id, SYSTEM_CASH_ACCOUNT);
        assert!(cash.is_system_account);
        assert_eq!(cash.header, HeaderCategory::Cash);
        assert_eq!(cash.balance_type, BalanceType::Debit);
    }
}
