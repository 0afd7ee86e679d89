//! Postgres-backed ledger store.
//!
//! Runtime queries with binds (no compile-time schema coupling). A recorded
//! transaction writes its header and both entries inside one database
//! transaction; any failure rolls the whole unit back and surfaces as
//! `LedgerError::Persistence`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use sambaza_core::{AccountId, LedgerError, LedgerResult, RecordMeta};
use sambaza_ledger::{
    Account, AccountEntry, BalanceType, Currency, HeaderCategory, LedgerStore, Transaction,
};

/// Postgres ledger store.
///
/// Shares a [`PgPool`]; cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and run schema migration.
    pub async fn connect(database_url: &str) -> LedgerResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Create the ledger tables when absent.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> LedgerResult<()> {
        const STATEMENTS: &[&str] = &[
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id UUID PRIMARY KEY,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                deleted_at TIMESTAMPTZ,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                number TEXT NOT NULL UNIQUE,
                currency TEXT NOT NULL,
                balance_type TEXT NOT NULL,
                header TEXT NOT NULL,
                is_system_account BOOLEAN NOT NULL DEFAULT FALSE
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id UUID PRIMARY KEY,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                deleted_at TIMESTAMPTZ,
                description TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS account_entries (
                id UUID PRIMARY KEY,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                deleted_at TIMESTAMPTZ,
                debit_amount NUMERIC NOT NULL,
                credit_amount NUMERIC NOT NULL,
                effective_date TIMESTAMPTZ NOT NULL,
                account_id UUID NOT NULL REFERENCES accounts (id),
                transaction_id UUID NOT NULL REFERENCES transactions (id)
            )
            "#,
            r#"
            CREATE INDEX IF NOT EXISTS account_entries_account_id_idx
                ON account_entries (account_id)
            "#,
        ];

        for statement in STATEMENTS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("migrate", e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    #[instrument(skip(self, account), fields(account_id = %account.id), err)]
    async fn create_account(&self, account: Account) -> LedgerResult<Account> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, active, created_at, updated_at, deleted_at,
                name, description, number, currency, balance_type,
                header, is_system_account
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.meta.active)
        .bind(account.meta.created_at)
        .bind(account.meta.updated_at)
        .bind(account.meta.deleted_at)
        .bind(&account.name)
        .bind(&account.description)
        .bind(&account.number)
        .bind(account.currency.to_string())
        .bind(account.balance_type.to_string())
        .bind(account.header.to_string())
        .bind(account.is_system_account)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("unable to create account", e))?;

        Ok(account)
    }

    #[instrument(skip_all, err)]
    async fn create_transaction(
        &self,
        description: &str,
        mut debit_entry: AccountEntry,
        mut credit_entry: AccountEntry,
    ) -> LedgerResult<Transaction> {
        let transaction = Transaction::new(description);
        debit_entry.transaction_id = Some(transaction.id);
        credit_entry.transaction_id = Some(transaction.id);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO transactions (id, active, created_at, updated_at, deleted_at, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(transaction.id.as_uuid())
        .bind(transaction.meta.active)
        .bind(transaction.meta.created_at)
        .bind(transaction.meta.updated_at)
        .bind(transaction.meta.deleted_at)
        .bind(&transaction.description)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("unable to create an accounting transaction", e))?;

        for entry in [&debit_entry, &credit_entry] {
            sqlx::query(
                r#"
                INSERT INTO account_entries (
                    id, active, created_at, updated_at, deleted_at,
                    debit_amount, credit_amount, effective_date,
                    account_id, transaction_id
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(entry.id.as_uuid())
            .bind(entry.meta.active)
            .bind(entry.meta.created_at)
            .bind(entry.meta.updated_at)
            .bind(entry.meta.deleted_at)
            .bind(entry.debit_amount)
            .bind(entry.credit_amount)
            .bind(entry.effective_date)
            .bind(entry.account_id.as_uuid())
            .bind(entry.transaction_id.map(Uuid::from))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("unable to create an account entry", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("unable to commit transaction", e))?;

        Ok(transaction)
    }

    #[instrument(skip(self), err)]
    async fn get_account(&self, account_id: AccountId) -> LedgerResult<Account> {
        let row = sqlx::query(
            r#"
            SELECT id, active, created_at, updated_at, deleted_at,
                   name, description, number, currency, balance_type,
                   header, is_system_account
            FROM accounts
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("unable to get account", e))?;

        match row {
            Some(row) => account_from_row(&row),
            None => Err(LedgerError::AccountNotFound(account_id)),
        }
    }

    async fn account_debit_total(&self, account_id: AccountId) -> LedgerResult<Decimal> {
        sum_column(&self.pool, "debit_amount", account_id).await
    }

    async fn account_credit_total(&self, account_id: AccountId) -> LedgerResult<Decimal> {
        sum_column(&self.pool, "credit_amount", account_id).await
    }
}

async fn sum_column(pool: &PgPool, column: &str, account_id: AccountId) -> LedgerResult<Decimal> {
    // Column names come from the two callers above, never from input.
    let sql = format!(
        "SELECT COALESCE(SUM({column}), 0) FROM account_entries WHERE account_id = $1"
    );
    sqlx::query_scalar(&sql)
        .bind(account_id.as_uuid())
        .fetch_one(pool)
        .await
        .map_err(|e| map_sqlx_error("unable to aggregate account entries", e))
}

fn account_from_row(row: &PgRow) -> LedgerResult<Account> {
    let currency: String = try_column(row, "currency")?;
    let balance_type: String = try_column(row, "balance_type")?;
    let header: String = try_column(row, "header")?;

    Ok(Account {
        id: AccountId::from_uuid(try_column(row, "id")?),
        meta: RecordMeta {
            active: try_column(row, "active")?,
            created_at: try_column::<DateTime<Utc>>(row, "created_at")?,
            updated_at: try_column::<DateTime<Utc>>(row, "updated_at")?,
            deleted_at: try_column::<Option<DateTime<Utc>>>(row, "deleted_at")?,
        },
        name: try_column(row, "name")?,
        description: try_column(row, "description")?,
        number: try_column(row, "number")?,
        currency: parse_currency(&currency)?,
        balance_type: parse_balance_type(&balance_type)?,
        header: parse_header(&header)?,
        is_system_account: try_column(row, "is_system_account")?,
    })
}

fn try_column<'r, T>(row: &'r PgRow, column: &str) -> LedgerResult<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| map_sqlx_error(&format!("unable to decode column {column}"), e))
}

fn parse_currency(value: &str) -> LedgerResult<Currency> {
    match value {
        "KSH" => Ok(Currency::Ksh),
        "UGX" => Ok(Currency::Ugx),
        other => Err(LedgerError::persistence(format!(
            "unexpected currency code in storage: {other}"
        ))),
    }
}

fn parse_balance_type(value: &str) -> LedgerResult<BalanceType> {
    match value {
        "DR" => Ok(BalanceType::Debit),
        "CR" => Ok(BalanceType::Credit),
        other => Err(LedgerError::persistence(format!(
            "unexpected balance type in storage: {other}"
        ))),
    }
}

fn parse_header(value: &str) -> LedgerResult<HeaderCategory> {
    match value {
        "DEPOSIT" => Ok(HeaderCategory::Deposit),
        "LOAN" => Ok(HeaderCategory::Loan),
        "CASH" => Ok(HeaderCategory::Cash),
        other => Err(LedgerError::persistence(format!(
            "unexpected header category in storage: {other}"
        ))),
    }
}

fn map_sqlx_error(context: &str, error: sqlx::Error) -> LedgerError {
    LedgerError::persistence(format!("{context}: {error}"))
}
