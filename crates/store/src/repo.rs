//! Repository traits - the seam between the engine and the store

use async_trait::async_trait;
use rust_decimal::Decimal;
use unitybank_core::{
    Account, AccountStatus, BankError, Customer, CustomerAccountRow, NewCustomer, NewTxn,
    TxnRecord,
};

/// Customer rows. Customers are never deleted while an account references
/// them; nothing here exposes a delete.
#[async_trait]
pub trait CustomerRepository {
    /// Insert a customer and return the store-assigned id.
    ///
    /// A duplicate email surfaces as `Validation { field: "email" }`.
    async fn insert_customer(&self, customer: NewCustomer) -> Result<i64, BankError>;

    async fn fetch_customer(&self, id: i64) -> Result<Option<Customer>, BankError>;

    /// Customers left-joined with their accounts, ordered by customer id
    /// ascending. Customers without an account keep their row, with the
    /// account fields absent.
    async fn list_customer_accounts(&self) -> Result<Vec<CustomerAccountRow>, BankError>;
}

/// Account reads outside of a write transaction.
#[async_trait]
pub trait AccountRepository {
    async fn fetch_account(&self, account_no: &str) -> Result<Option<Account>, BankError>;

    /// Collision probe for the identifier generator. The PRIMARY KEY on
    /// insert remains the hard uniqueness guarantee.
    async fn account_no_exists(&self, account_no: &str) -> Result<bool, BankError>;
}

/// Transaction history reads. The ledger is append-only; there is no way to
/// update or delete a row through this interface.
#[async_trait]
pub trait TransactionRepository {
    /// Full history for one account, ascending by timestamp then id.
    async fn transactions_for_account(&self, account_no: &str)
        -> Result<Vec<TxnRecord>, BankError>;

    /// The most recent `limit` transactions across all accounts, presented
    /// ascending by timestamp then id.
    async fn recent_transactions(&self, limit: u32) -> Result<Vec<TxnRecord>, BankError>;

    /// The latest `n` transactions for one account, newest first (statement
    /// summaries).
    async fn latest_for_account(
        &self,
        account_no: &str,
        n: u32,
    ) -> Result<Vec<TxnRecord>, BankError>;
}

/// One atomic write unit against the ledger.
///
/// All reads and writes of a money-moving operation happen through the same
/// `LedgerTx`; nothing is visible to other callers until `commit`, and a
/// dropped transaction leaves no trace.
#[async_trait]
pub trait LedgerTx: Send {
    /// Read an account row for subsequent mutation within this transaction.
    async fn account_for_update(&mut self, account_no: &str)
        -> Result<Option<Account>, BankError>;

    /// Insert a freshly opened account.
    ///
    /// An account-number collision that slipped past the generator surfaces
    /// as `DuplicateIdentifier`.
    async fn insert_account(&mut self, account: &Account) -> Result<(), BankError>;

    /// Overwrite an account balance with an already-normalized value.
    async fn update_balance(
        &mut self,
        account_no: &str,
        new_balance: Decimal,
    ) -> Result<(), BankError>;

    /// Append a transaction row. The store assigns the id and timestamp.
    async fn insert_txn(&mut self, txn: NewTxn) -> Result<(), BankError>;

    async fn update_pin(&mut self, account_no: &str, pin: &str) -> Result<(), BankError>;

    /// Set the account status. Returns false when no row was affected.
    async fn update_status(
        &mut self,
        account_no: &str,
        status: AccountStatus,
    ) -> Result<bool, BankError>;

    async fn commit(self: Box<Self>) -> Result<(), BankError>;
}

/// The full ledger store: the read repositories plus the ability to open a
/// write transaction.
#[async_trait]
pub trait LedgerStore:
    CustomerRepository + AccountRepository + TransactionRepository + Send + Sync
{
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, BankError>;
}
