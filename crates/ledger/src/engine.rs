//! The ledger engine: account creation, transfers, balance retrieval.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use sambaza_core::{AccountId, LedgerError, LedgerResult};

use crate::account::{Account, BalanceType, Currency, HeaderCategory, SYSTEM_CASH_ACCOUNT};
use crate::entry::{AccountEntry, validate_amount};
use crate::store::LedgerStore;
use crate::transaction::Transaction;

/// Input for customer account creation.
///
/// `header` is required: the balance type is always derived from it, never
/// defaulted.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountCreationInput {
    pub customer_name: String,
    pub amount: Option<Decimal>,
    pub currency: Currency,
    pub header: HeaderCategory,
}

/// Input for a transfer between two resolved accounts.
#[derive(Debug, Clone)]
pub struct TransferInput {
    pub source_account: Option<AccountInformation>,
    pub destination_account: Option<AccountInformation>,
    pub amount: Decimal,
    /// Overrides the generated description (used by account activation).
    pub description: Option<String>,
}

/// An account together with its derived balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountInformation {
    pub id: AccountId,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub description: String,
    pub number: String,
    pub currency: Currency,
    pub balance_type: BalanceType,
    pub header: HeaderCategory,
    pub is_system_account: bool,
    pub balance: Decimal,
    pub balance_as_of: DateTime<Utc>,
}

impl AccountInformation {
    fn from_account(account: Account, balance: Decimal, balance_as_of: DateTime<Utc>) -> Self {
        Self {
            id: account.id,
            active: account.meta.active,
            created_at: account.meta.created_at,
            updated_at: account.meta.updated_at,
            name: account.name,
            description: account.description,
            number: account.number,
            currency: account.currency,
            balance_type: account.balance_type,
            header: account.header,
            is_system_account: account.is_system_account,
            balance,
            balance_as_of,
        }
    }
}

/// Construct the balancing entry pair for a transfer.
///
/// Only depositable source categories (deposit, cash) have a construction
/// rule. The source is debited and the destination credited for the full
/// amount, so each account moves in its normal direction: a credit-normal
/// destination grows, a credit-normal source shrinks.
pub fn build_transfer_entries(
    source: &AccountInformation,
    destination: &AccountInformation,
    amount: Decimal,
) -> LedgerResult<(AccountEntry, AccountEntry)> {
    if !source.header.supports_outgoing_transfers() {
        return Err(LedgerError::unsupported_header(source.header.to_string()));
    }

    let debit_entry = AccountEntry::debit(source.id, amount);
    let credit_entry = AccountEntry::credit(destination.id, amount);
    Ok((debit_entry, credit_entry))
}

/// Per-account locks serializing check-and-commit spans.
///
/// Transfers against distinct source accounts proceed concurrently; two
/// transfers out of the same account queue up so the second one sees the
/// first one's entries before its insufficient-funds decision.
#[derive(Debug, Default)]
struct AccountLocks {
    inner: StdMutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    fn lock_for(&self, account_id: AccountId) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(account_id).or_default().clone()
    }
}

/// Orchestrates account creation, transfer execution and balance retrieval
/// over a [`LedgerStore`].
pub struct LedgerEngine {
    store: Arc<dyn LedgerStore>,
    locks: AccountLocks,
}

impl LedgerEngine {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            locks: AccountLocks::default(),
        }
    }

    /// Create a customer account and fund it from the system cash account.
    ///
    /// The deposit amount must be present and strictly positive; zero and
    /// negative deposits are rejected, not silently accepted. Returns the
    /// account re-read with its now-current balance.
    #[tracing::instrument(
        skip(self, input),
        fields(customer = %input.customer_name, header = %input.header),
        err
    )]
    pub async fn create_customer_account(
        &self,
        input: AccountCreationInput,
    ) -> LedgerResult<AccountInformation> {
        let deposit_amount = input.amount.ok_or_else(|| {
            LedgerError::invalid_amount("a deposit amount should be provided for a new account")
        })?;
        validate_amount(deposit_amount)?;

        let label = format!("{} {} account", input.customer_name, input.header);
        let account = Account::new(label.clone(), label, input.currency, input.header);
        let account = self.store.create_account(account).await?;
        tracing::info!(account_id = %account.id, number = %account.number, "account created");

        let system_account = self.account(SYSTEM_CASH_ACCOUNT).await?;
        let destination = self.account(account.id).await?;

        self.transfer(TransferInput {
            source_account: Some(system_account),
            destination_account: Some(destination),
            amount: deposit_amount,
            description: Some("Account activation deposit".to_string()),
        })
        .await?;

        self.account(account.id).await
    }

    /// Resolve an account and attach its computed balance.
    pub async fn account(&self, account_id: AccountId) -> LedgerResult<AccountInformation> {
        let account = self.store.get_account(account_id).await?;
        let balance = self.store.account_balance(&account).await?;
        Ok(AccountInformation::from_account(account, balance, Utc::now()))
    }

    /// Move money from a source to a destination account.
    ///
    /// The source balance is re-read under the source account's lock so the
    /// insufficient-funds decision and the commit form one serialized span.
    /// System accounts bypass the balance check: they represent unlimited
    /// external funding sources.
    #[tracing::instrument(skip(self, input), fields(amount = %input.amount), err)]
    pub async fn transfer(&self, input: TransferInput) -> LedgerResult<Transaction> {
        let source = input
            .source_account
            .ok_or_else(|| LedgerError::missing_account("source account is required"))?;
        let destination = input
            .destination_account
            .ok_or_else(|| LedgerError::missing_account("destination account is required"))?;
        let amount = input.amount;

        let lock = self.locks.lock_for(source.id);
        let _guard = lock.lock().await;

        if !source.is_system_account {
            let current = self.store.get_account(source.id).await?;
            let balance = self.store.account_balance(&current).await?;
            if amount > balance {
                return Err(LedgerError::InsufficientFunds {
                    amount,
                    balance,
                    account_name: source.name,
                });
            }
        }

        let description = input.description.unwrap_or_else(|| {
            format!(
                "Deposit of {amount} from account {} to account {}",
                source.number, destination.number
            )
        });

        let (debit_entry, credit_entry) = build_transfer_entries(&source, &destination, amount)?;
        self.record_transaction(&description, Some(debit_entry), Some(credit_entry))
            .await
    }

    /// Record a transaction with its two balancing entries.
    ///
    /// Preconditions, checked in order, each short-circuiting: both entries
    /// supplied; each leg's amount strictly positive; debit equals credit.
    /// Persistence of the header and both entries is a single atomic unit.
    pub async fn record_transaction(
        &self,
        description: &str,
        debit_entry: Option<AccountEntry>,
        credit_entry: Option<AccountEntry>,
    ) -> LedgerResult<Transaction> {
        let debit_entry = debit_entry.ok_or_else(|| {
            LedgerError::missing_entry("DR entry should be provided for a transaction")
        })?;
        let credit_entry = credit_entry.ok_or_else(|| {
            LedgerError::missing_entry("CR entry should be provided for a transaction")
        })?;

        debit_entry.validate_debit_amount()?;
        credit_entry.validate_credit_amount()?;

        if debit_entry.debit_amount != credit_entry.credit_amount {
            return Err(LedgerError::UnbalancedTransaction {
                debit: debit_entry.debit_amount,
                credit: credit_entry.credit_amount,
            });
        }

        self.store
            .create_transaction(description, debit_entry, credit_entry)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use sambaza_core::RecordMeta;

    fn test_info(header: HeaderCategory, is_system: bool) -> AccountInformation {
        let meta = RecordMeta::new();
        AccountInformation {
            id: AccountId::new(),
            active: meta.active,
            created_at: meta.created_at,
            updated_at: meta.updated_at,
            name: format!("test {header} account"),
            description: format!("test {header} account"),
            number: "AC-0000000000".to_string(),
            currency: Currency::Ksh,
            balance_type: header.balance_type(),
            header,
            is_system_account: is_system,
            balance: Decimal::ZERO,
            balance_as_of: meta.created_at,
        }
    }

    #[test]
    fn transfer_entries_debit_source_and_credit_destination() {
        let source = test_info(HeaderCategory::Deposit, false);
        let destination = test_info(HeaderCategory::Deposit, false);

        let (debit, credit) = build_transfer_entries(&source, &destination, dec!(80)).unwrap();
        assert_eq!(debit.account_id, source.id);
        assert_eq!(debit.debit_amount, dec!(80));
        assert_eq!(credit.account_id, destination.id);
        assert_eq!(credit.credit_amount, dec!(80));
    }

    #[test]
    fn loan_source_has_no_construction_rule() {
        let source = test_info(HeaderCategory::Loan, false);
        let destination = test_info(HeaderCategory::Deposit, false);

        let err = build_transfer_entries(&source, &destination, dec!(10)).unwrap_err();
        assert!(matches!(err, LedgerError::UnsupportedHeaderCategory(ref c) if c == "LOAN"));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: for any positive amount, the constructed pair observes
        /// the double-entry invariant and would pass the recorder's checks.
        #[test]
        fn constructed_pairs_are_always_balanced(cents in 1i64..1_000_000_000i64) {
            let amount = Decimal::new(cents, 2);
            let source = test_info(HeaderCategory::Cash, true);
            let destination = test_info(HeaderCategory::Deposit, false);

            let (debit, credit) = build_transfer_entries(&source, &destination, amount).unwrap();

            prop_assert_eq!(debit.debit_amount, credit.credit_amount);
            prop_assert_eq!(debit.credit_amount, Decimal::ZERO);
            prop_assert_eq!(credit.debit_amount, Decimal::ZERO);
            prop_assert!(debit.validate_debit_amount().is_ok());
            prop_assert!(credit.validate_credit_amount().is_ok());
        }
    }
}
