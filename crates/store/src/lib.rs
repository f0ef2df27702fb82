//! Unity Bank Ledger Store
//!
//! The persistent repository of customers, accounts and transactions.
//! The operations engine only sees the traits in [`repo`]; the SQLite
//! implementation is the production backend, the in-memory one backs tests.
//!
//! Every money-moving operation runs inside a single [`repo::LedgerTx`]:
//! read the account rows, validate, write the new balances, append the
//! transaction rows, commit. Dropping an uncommitted transaction rolls
//! everything back, so a debit without its credit cannot reach the ledger.

pub mod memory;
pub mod repo;
pub mod sqlite;

pub use memory::MemoryLedger;
pub use repo::{AccountRepository, CustomerRepository, LedgerStore, LedgerTx, TransactionRepository};
pub use sqlite::SqliteLedger;
