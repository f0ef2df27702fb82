//! SQLite ledger store
//!
//! Decimals are persisted as normalized two-decimal TEXT and timestamps as
//! RFC 3339 UTC TEXT, so lexicographic ordering matches chronological
//! ordering. Connections carry busy/acquire timeouts: a contended writer
//! errors out as `StoreUnavailable` instead of hanging.

use crate::repo::{
    AccountRepository, CustomerRepository, LedgerStore, LedgerTx, TransactionRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use unitybank_core::{
    Account, AccountStatus, BankError, Customer, CustomerAccountRow, NewCustomer, NewTxn,
    TxnRecord,
};

const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed ledger store. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    /// Open (or create) a database file and ensure the schema exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .busy_timeout(STORE_TIMEOUT)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .acquire_timeout(STORE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(store_err)?;

        let ledger = Self { pool };
        ledger.init().await?;
        Ok(ledger)
    }

    /// Open a private in-memory database (tests).
    ///
    /// A single connection, because every pooled connection would otherwise
    /// get its own empty in-memory database.
    pub async fn open_in_memory() -> Result<Self, BankError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(store_err)?;

        let ledger = Self { pool };
        ledger.init().await?;
        Ok(ledger)
    }

    async fn init(&self) -> Result<(), BankError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS customers (
                cust_id  INTEGER PRIMARY KEY AUTOINCREMENT,
                name     TEXT NOT NULL,
                gender   TEXT NOT NULL,
                dob      TEXT NOT NULL,
                mobile   TEXT NOT NULL,
                email    TEXT NOT NULL UNIQUE,
                address  TEXT NOT NULL,
                password TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                account_no   TEXT PRIMARY KEY,
                cust_id      INTEGER NOT NULL REFERENCES customers(cust_id),
                cust_name    TEXT NOT NULL,
                account_type TEXT NOT NULL,
                pin          TEXT NOT NULL,
                balance      TEXT NOT NULL,
                routing_code TEXT NOT NULL,
                status       TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                txn_id     INTEGER PRIMARY KEY AUTOINCREMENT,
                account_no TEXT NOT NULL REFERENCES accounts(account_no),
                cust_name  TEXT NOT NULL,
                txn_type   TEXT NOT NULL,
                amount     TEXT NOT NULL,
                txn_date   TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_txn_account
            ON transactions(account_no, txn_date, txn_id)
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        tracing::debug!("ledger schema ensured");
        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for SqliteLedger {
    async fn insert_customer(&self, customer: NewCustomer) -> Result<i64, BankError> {
        let result = sqlx::query(
            r#"
            INSERT INTO customers (name, gender, dob, mobile, email, address, password)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.gender)
        .bind(customer.dob.to_string())
        .bind(&customer.mobile)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(&customer.password)
        .execute(&self.pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            true => BankError::Validation { field: "email" },
            false => store_err(e),
        })?;

        Ok(result.last_insert_rowid())
    }

    async fn fetch_customer(&self, id: i64) -> Result<Option<Customer>, BankError> {
        let row = sqlx::query("SELECT * FROM customers WHERE cust_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;

        row.as_ref().map(map_customer).transpose()
    }

    async fn list_customer_accounts(&self) -> Result<Vec<CustomerAccountRow>, BankError> {
        let rows = sqlx::query(
            r#"
            SELECT c.cust_id, c.name, c.mobile,
                   a.account_no, a.account_type, a.balance, a.status
            FROM customers c
            LEFT JOIN accounts a ON c.cust_id = a.cust_id
            ORDER BY c.cust_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.iter().map(map_join_row).collect()
    }
}

#[async_trait]
impl AccountRepository for SqliteLedger {
    async fn fetch_account(&self, account_no: &str) -> Result<Option<Account>, BankError> {
        let row = sqlx::query("SELECT * FROM accounts WHERE account_no = ?")
            .bind(account_no)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;

        row.as_ref().map(map_account).transpose()
    }

    async fn account_no_exists(&self, account_no: &str) -> Result<bool, BankError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM accounts WHERE account_no = ?")
            .bind(account_no)
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;

        let n: i64 = row.try_get("n").map_err(store_err)?;
        Ok(n > 0)
    }
}

#[async_trait]
impl TransactionRepository for SqliteLedger {
    async fn transactions_for_account(
        &self,
        account_no: &str,
    ) -> Result<Vec<TxnRecord>, BankError> {
        let rows = sqlx::query(
            r#"
            SELECT txn_id, account_no, cust_name, txn_type, amount, txn_date
            FROM transactions
            WHERE account_no = ?
            ORDER BY txn_date ASC, txn_id ASC
            "#,
        )
        .bind(account_no)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.iter().map(map_txn).collect()
    }

    async fn recent_transactions(&self, limit: u32) -> Result<Vec<TxnRecord>, BankError> {
        // Newest `limit` rows overall, presented in ascending order.
        let rows = sqlx::query(
            r#"
            SELECT * FROM (
                SELECT txn_id, account_no, cust_name, txn_type, amount, txn_date
                FROM transactions
                ORDER BY txn_date DESC, txn_id DESC
                LIMIT ?
            )
            ORDER BY txn_date ASC, txn_id ASC
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.iter().map(map_txn).collect()
    }

    async fn latest_for_account(
        &self,
        account_no: &str,
        n: u32,
    ) -> Result<Vec<TxnRecord>, BankError> {
        let rows = sqlx::query(
            r#"
            SELECT txn_id, account_no, cust_name, txn_type, amount, txn_date
            FROM transactions
            WHERE account_no = ?
            ORDER BY txn_date DESC, txn_id DESC
            LIMIT ?
            "#,
        )
        .bind(account_no)
        .bind(n)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.iter().map(map_txn).collect()
    }
}

#[async_trait]
impl LedgerStore for SqliteLedger {
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, BankError> {
        let tx = self.pool.begin().await.map_err(store_err)?;
        Ok(Box::new(SqliteTx { tx }))
    }
}

/// A write transaction over one pooled connection. Rolls back on drop.
struct SqliteTx {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl LedgerTx for SqliteTx {
    async fn account_for_update(
        &mut self,
        account_no: &str,
    ) -> Result<Option<Account>, BankError> {
        let row = sqlx::query("SELECT * FROM accounts WHERE account_no = ?")
            .bind(account_no)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(store_err)?;

        row.as_ref().map(map_account).transpose()
    }

    async fn insert_account(&mut self, account: &Account) -> Result<(), BankError> {
        sqlx::query(
            r#"
            INSERT INTO accounts
                (account_no, cust_id, cust_name, account_type, pin, balance, routing_code, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.account_no)
        .bind(account.cust_id)
        .bind(&account.cust_name)
        .bind(account.account_type.to_string())
        .bind(&account.pin)
        .bind(account.balance.to_string())
        .bind(&account.routing_code)
        .bind(account.status.to_string())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| match unique_violation(&e) {
            true => BankError::DuplicateIdentifier,
            false => store_err(e),
        })?;

        Ok(())
    }

    async fn update_balance(
        &mut self,
        account_no: &str,
        new_balance: Decimal,
    ) -> Result<(), BankError> {
        sqlx::query("UPDATE accounts SET balance = ? WHERE account_no = ?")
            .bind(new_balance.to_string())
            .bind(account_no)
            .execute(&mut *self.tx)
            .await
            .map_err(store_err)?;

        Ok(())
    }

    async fn insert_txn(&mut self, txn: NewTxn) -> Result<(), BankError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (account_no, cust_name, txn_type, amount, txn_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&txn.account_no)
        .bind(&txn.cust_name)
        .bind(txn.txn_type.to_string())
        .bind(txn.amount.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *self.tx)
        .await
        .map_err(store_err)?;

        Ok(())
    }

    async fn update_pin(&mut self, account_no: &str, pin: &str) -> Result<(), BankError> {
        sqlx::query("UPDATE accounts SET pin = ? WHERE account_no = ?")
            .bind(pin)
            .bind(account_no)
            .execute(&mut *self.tx)
            .await
            .map_err(store_err)?;

        Ok(())
    }

    async fn update_status(
        &mut self,
        account_no: &str,
        status: AccountStatus,
    ) -> Result<bool, BankError> {
        let result = sqlx::query("UPDATE accounts SET status = ? WHERE account_no = ?")
            .bind(status.to_string())
            .bind(account_no)
            .execute(&mut *self.tx)
            .await
            .map_err(store_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> Result<(), BankError> {
        self.tx.commit().await.map_err(store_err)
    }
}

fn store_err(e: sqlx::Error) -> BankError {
    BankError::StoreUnavailable(e.to_string())
}

fn unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn corrupt(column: &str) -> BankError {
    BankError::StoreUnavailable(format!("corrupt {} column", column))
}

fn map_customer(row: &SqliteRow) -> Result<Customer, BankError> {
    let dob: String = row.try_get("dob").map_err(store_err)?;

    Ok(Customer {
        id: row.try_get("cust_id").map_err(store_err)?,
        name: row.try_get("name").map_err(store_err)?,
        gender: row.try_get("gender").map_err(store_err)?,
        dob: NaiveDate::from_str(&dob).map_err(|_| corrupt("dob"))?,
        mobile: row.try_get("mobile").map_err(store_err)?,
        email: row.try_get("email").map_err(store_err)?,
        address: row.try_get("address").map_err(store_err)?,
        password: row.try_get("password").map_err(store_err)?,
    })
}

fn map_account(row: &SqliteRow) -> Result<Account, BankError> {
    let account_type: String = row.try_get("account_type").map_err(store_err)?;
    let balance: String = row.try_get("balance").map_err(store_err)?;
    let status: String = row.try_get("status").map_err(store_err)?;

    Ok(Account {
        account_no: row.try_get("account_no").map_err(store_err)?,
        cust_id: row.try_get("cust_id").map_err(store_err)?,
        cust_name: row.try_get("cust_name").map_err(store_err)?,
        account_type: account_type.parse().map_err(|_| corrupt("account_type"))?,
        pin: row.try_get("pin").map_err(store_err)?,
        balance: Decimal::from_str(&balance).map_err(|_| corrupt("balance"))?,
        routing_code: row.try_get("routing_code").map_err(store_err)?,
        status: status.parse().map_err(|_| corrupt("status"))?,
    })
}

fn map_txn(row: &SqliteRow) -> Result<TxnRecord, BankError> {
    let txn_type: String = row.try_get("txn_type").map_err(store_err)?;
    let amount: String = row.try_get("amount").map_err(store_err)?;
    let txn_date: String = row.try_get("txn_date").map_err(store_err)?;

    Ok(TxnRecord {
        txn_id: row.try_get("txn_id").map_err(store_err)?,
        account_no: row.try_get("account_no").map_err(store_err)?,
        cust_name: row.try_get("cust_name").map_err(store_err)?,
        txn_type: txn_type.parse().map_err(|_| corrupt("txn_type"))?,
        amount: Decimal::from_str(&amount).map_err(|_| corrupt("amount"))?,
        txn_date: DateTime::parse_from_rfc3339(&txn_date)
            .map_err(|_| corrupt("txn_date"))?
            .with_timezone(&Utc),
    })
}

fn map_join_row(row: &SqliteRow) -> Result<CustomerAccountRow, BankError> {
    let account_type: Option<String> = row.try_get("account_type").map_err(store_err)?;
    let balance: Option<String> = row.try_get("balance").map_err(store_err)?;
    let status: Option<String> = row.try_get("status").map_err(store_err)?;

    Ok(CustomerAccountRow {
        cust_id: row.try_get("cust_id").map_err(store_err)?,
        name: row.try_get("name").map_err(store_err)?,
        mobile: row.try_get("mobile").map_err(store_err)?,
        account_no: row.try_get("account_no").map_err(store_err)?,
        account_type: account_type
            .map(|t| t.parse().map_err(|_| corrupt("account_type")))
            .transpose()?,
        balance: balance
            .map(|b| Decimal::from_str(&b).map_err(|_| corrupt("balance")))
            .transpose()?,
        status: status
            .map(|s| s.parse().map_err(|_| corrupt("status")))
            .transpose()?,
    })
}
