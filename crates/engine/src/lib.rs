//! Unity Bank operations engine
//!
//! This is the HEART of the system. All balance mutations go through
//! [`AccountOps`]: validated, authorized, and executed inside a single store
//! transaction paired with an immutable transaction record. Read-only
//! projections live in [`LedgerQueries`].
//!
//! The engine holds no state across calls; everything durable belongs to the
//! ledger store it is given.

pub mod idgen;
pub mod ops;
pub mod query;

pub use ops::{AccountOps, CustomerRegistration, OpenedAccount};
pub use query::LedgerQueries;
