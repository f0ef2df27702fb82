//! Error taxonomy shared by every layer

use thiserror::Error;

/// Errors surfaced by ledger operations.
///
/// Domain errors (`Validation`, `AuthFailed`, ...) are final and must be
/// shown to the caller as-is. Only `StoreUnavailable` is safe to retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("invalid {field}")]
    Validation { field: &'static str },

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("account is blocked")]
    AccountBlocked,

    #[error("name does not match account")]
    OwnerMismatch,

    #[error("incorrect PIN")]
    AuthFailed,

    #[error("insufficient balance")]
    InsufficientFunds,

    #[error("could not allocate a unique identifier")]
    DuplicateIdentifier,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl BankError {
    /// Whether the caller may retry the operation unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BankError::StoreUnavailable(_))
    }
}
