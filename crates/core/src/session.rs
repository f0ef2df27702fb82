//! Session context passed into every core operation
//!
//! The operator identity is an explicit parameter rather than process-wide
//! state, so concurrent callers cannot observe each other's session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who is driving the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// A branch employee acting on a customer's behalf.
    Teller { name: String },
    /// A customer acting on their own account.
    Customer { name: String },
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Teller { name } => write!(f, "teller:{}", name),
            Operator::Customer { name } => write!(f, "customer:{}", name),
        }
    }
}

/// Explicit per-call session context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub operator: Operator,
}

impl SessionContext {
    pub fn teller(name: impl Into<String>) -> Self {
        Self {
            operator: Operator::Teller { name: name.into() },
        }
    }

    pub fn customer(name: impl Into<String>) -> Self {
        Self {
            operator: Operator::Customer { name: name.into() },
        }
    }
}
