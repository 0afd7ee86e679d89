//! In-memory ledger store.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;

use sambaza_core::{AccountId, LedgerError, LedgerResult, TransactionId};
use sambaza_ledger::{Account, AccountEntry, LedgerStore, Transaction};

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    numbers: HashSet<String>,
    transactions: HashMap<TransactionId, Transaction>,
    entries: Vec<AccountEntry>,
}

/// In-memory ledger store.
///
/// Intended for tests/dev. All mutation happens under a single write guard,
/// so a recorded transaction (header + both entries) is atomic: validation
/// runs first and the state is only touched once every check has passed.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: RwLock<State>,
    fail_next_commit: AtomicBool,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_transaction` fail after its checks, leaving
    /// state untouched. Lets tests observe rollback behavior.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Snapshot of all recorded entries.
    pub fn entries(&self) -> Vec<AccountEntry> {
        self.read_state(|state| state.entries.clone())
    }

    pub fn transaction_count(&self) -> usize {
        self.read_state(|state| state.transactions.len())
    }

    pub fn entry_count(&self) -> usize {
        self.read_state(|state| state.entries.len())
    }

    fn read_state<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn create_account(&self, account: Account) -> LedgerResult<Account> {
        let mut state = self
            .state
            .write()
            .map_err(|_| LedgerError::persistence("lock poisoned"))?;

        if state.accounts.contains_key(&account.id) {
            return Err(LedgerError::persistence(format!(
                "duplicate key value violates unique constraint: account {}",
                account.id
            )));
        }
        if !state.numbers.insert(account.number.clone()) {
            return Err(LedgerError::persistence(format!(
                "duplicate key value violates unique constraint: number {}",
                account.number
            )));
        }

        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn create_transaction(
        &self,
        description: &str,
        mut debit_entry: AccountEntry,
        mut credit_entry: AccountEntry,
    ) -> LedgerResult<Transaction> {
        let mut state = self
            .state
            .write()
            .map_err(|_| LedgerError::persistence("lock poisoned"))?;

        for entry in [&debit_entry, &credit_entry] {
            if !state.accounts.contains_key(&entry.account_id) {
                return Err(LedgerError::persistence(format!(
                    "foreign key violation: account {} does not exist",
                    entry.account_id
                )));
            }
        }

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(LedgerError::persistence(
                "unable to commit transaction: simulated storage failure",
            ));
        }

        let transaction = Transaction::new(description);
        debit_entry.transaction_id = Some(transaction.id);
        credit_entry.transaction_id = Some(transaction.id);

        state.transactions.insert(transaction.id, transaction.clone());
        state.entries.push(debit_entry);
        state.entries.push(credit_entry);

        Ok(transaction)
    }

    async fn get_account(&self, account_id: AccountId) -> LedgerResult<Account> {
        self.read_state(|state| {
            state
                .accounts
                .get(&account_id)
                .cloned()
                .ok_or(LedgerError::AccountNotFound(account_id))
        })
    }

    async fn account_debit_total(&self, account_id: AccountId) -> LedgerResult<Decimal> {
        self.read_state(|state| {
            Ok(state
                .entries
                .iter()
                .filter(|e| e.account_id == account_id)
                .map(|e| e.debit_amount)
                .sum())
        })
    }

    async fn account_credit_total(&self, account_id: AccountId) -> LedgerResult<Decimal> {
        self.read_state(|state| {
            Ok(state
                .entries
                .iter()
                .filter(|e| e.account_id == account_id)
                .map(|e| e.credit_amount)
                .sum())
        })
    }
}
