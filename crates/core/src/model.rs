//! Domain model: customers, accounts, transactions
//!
//! The string forms of the enums below are what the store persists and what
//! statements display, so the `strum` serializations are part of the data
//! contract (`"Transfer Out"`, not `"TransferOut"`).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Offered account products.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
pub enum AccountType {
    Savings,
    Current,
}

/// Account lifecycle status. Only `Active` accounts move money.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
pub enum AccountStatus {
    Active,
    Blocked,
}

/// Transaction record type. A transfer writes one row per leg.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
pub enum TxnType {
    Deposit,
    Withdraw,
    #[strum(serialize = "Transfer Out")]
    #[serde(rename = "Transfer Out")]
    TransferOut,
    #[strum(serialize = "Transfer In")]
    #[serde(rename = "Transfer In")]
    TransferIn,
}

/// A registered customer. The identifier is store-assigned and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub dob: NaiveDate,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub password: String,
}

/// Customer registration payload (KYC), before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub gender: String,
    pub dob: NaiveDate,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub password: String,
}

/// A bank account.
///
/// `cust_name` is denormalized from the owning customer at creation time and
/// never cascade-updated afterwards. `balance` is kept at scale 2 and is
/// never negative; it is only ever mutated through deposit, withdraw and
/// transfer operations, each paired with a transaction row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_no: String,
    pub cust_id: i64,
    pub cust_name: String,
    pub account_type: AccountType,
    pub pin: String,
    pub balance: Decimal,
    pub routing_code: String,
    pub status: AccountStatus,
}

/// An immutable ledger row. Created exactly once per balance mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxnRecord {
    pub txn_id: i64,
    pub account_no: String,
    pub cust_name: String,
    pub txn_type: TxnType,
    pub amount: Decimal,
    pub txn_date: DateTime<Utc>,
}

/// A ledger row to append. The store assigns the id and the timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTxn {
    pub account_no: String,
    pub cust_name: String,
    pub txn_type: TxnType,
    pub amount: Decimal,
}

/// One row of the customers-with-accounts listing.
///
/// Customers without an account appear with the account fields absent, not
/// as omitted rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerAccountRow {
    pub cust_id: i64,
    pub name: String,
    pub mobile: String,
    pub account_no: Option<String>,
    pub account_type: Option<AccountType>,
    pub balance: Option<Decimal>,
    pub status: Option<AccountStatus>,
}

/// Statement payload handed to the notification collaborator.
///
/// Carries the data needed to build a textual summary; rendering it is the
/// caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSummary {
    pub account_no: String,
    pub cust_name: String,
    pub mobile: String,
    pub balance: Decimal,
    /// The 5 most recent transactions, newest first.
    pub recent: Vec<TxnRecord>,
}
