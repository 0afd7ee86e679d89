//! Persistence port consumed by the ledger engine.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use sambaza_core::{AccountId, LedgerError, LedgerResult};

use crate::account::{Account, system_accounts};
use crate::entry::AccountEntry;
use crate::transaction::Transaction;

/// Storage adapter contract.
///
/// The engine never talks to a database directly; every read and write goes
/// through this port. Implementations must make `create_transaction` atomic:
/// the transaction row and both entry rows persist together or not at all,
/// with `LedgerError::Persistence` on any storage failure.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persist a new account. Fails with `Persistence` on constraint
    /// violations (duplicate id or number).
    async fn create_account(&self, account: Account) -> LedgerResult<Account>;

    /// Persist a transaction plus its two balancing entries as one atomic
    /// unit, stamping each entry with the new transaction's id.
    ///
    /// Precondition checks (presence, positivity, double entry) are the
    /// recorder's job; implementations only guarantee atomicity and
    /// referential integrity.
    async fn create_transaction(
        &self,
        description: &str,
        debit_entry: AccountEntry,
        credit_entry: AccountEntry,
    ) -> LedgerResult<Transaction>;

    /// Resolve an account by id. Fails with `AccountNotFound` for ids that
    /// do not resolve to a stored account.
    async fn get_account(&self, account_id: AccountId) -> LedgerResult<Account>;

    /// Sum of all debit amounts ever posted to the account. An account with
    /// no entries totals zero.
    async fn account_debit_total(&self, account_id: AccountId) -> LedgerResult<Decimal>;

    /// Sum of all credit amounts ever posted to the account.
    async fn account_credit_total(&self, account_id: AccountId) -> LedgerResult<Decimal>;

    /// Derive the account's current balance from aggregated entry history.
    ///
    /// Idempotent and side-effect-free: repeated calls with no new entries
    /// return the same value.
    async fn account_balance(&self, account: &Account) -> LedgerResult<Decimal> {
        let total_debit = self.account_debit_total(account.id).await?;
        let total_credit = self.account_credit_total(account.id).await?;
        Ok(account.balance_type.balance(total_debit, total_credit))
    }

    /// Idempotently create the system control accounts. Called once at
    /// startup, before any customer account creation is served.
    async fn seed_system_accounts(&self) -> LedgerResult<()> {
        for account in system_accounts() {
            match self.get_account(account.id).await {
                Ok(_) => {}
                Err(LedgerError::AccountNotFound(_)) => {
                    self.create_account(account).await?;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    async fn create_account(&self, account: Account) -> LedgerResult<Account> {
        (**self).create_account(account).await
    }

    async fn create_transaction(
        &self,
        description: &str,
        debit_entry: AccountEntry,
        credit_entry: AccountEntry,
    ) -> LedgerResult<Transaction> {
        (**self)
            .create_transaction(description, debit_entry, credit_entry)
            .await
    }

    async fn get_account(&self, account_id: AccountId) -> LedgerResult<Account> {
        (**self).get_account(account_id).await
    }

    async fn account_debit_total(&self, account_id: AccountId) -> LedgerResult<Decimal> {
        (**self).account_debit_total(account_id).await
    }

    async fn account_credit_total(&self, account_id: AccountId) -> LedgerResult<Decimal> {
        (**self).account_credit_total(account_id).await
    }

    async fn account_balance(&self, account: &Account) -> LedgerResult<Decimal> {
        (**self).account_balance(account).await
    }

    async fn seed_system_accounts(&self) -> LedgerResult<()> {
        (**self).seed_system_accounts().await
    }
}
