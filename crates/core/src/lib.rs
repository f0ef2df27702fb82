//! Unity Bank Core - Domain types
//!
//! This crate contains the fundamental types used across Unity Bank:
//! - `Amount`: Positive, two-decimal money wrapper
//! - `model`: Customers, accounts, transactions and their enums
//! - `validate`: Pure field validators (date, mobile, PIN)
//! - `BankError`: The error taxonomy shared by every layer

pub mod error;
pub mod model;
pub mod money;
pub mod session;
pub mod validate;

pub use error::BankError;
pub use model::{
    Account, AccountStatus, AccountType, Customer, CustomerAccountRow, NewCustomer, NewTxn,
    StatementSummary, TxnRecord, TxnType,
};
pub use money::{normalize, Amount};
pub use session::{Operator, SessionContext};
pub use validate::{validate_date, validate_mobile, validate_pin};
