//! Outbound notification channel
//!
//! The core never depends on a concrete delivery mechanism: it hands a
//! `(contact, message)` pair to a [`Notifier`] after the money movement has
//! committed. Delivery failure is reported on its own and never unwinds a
//! committed operation.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use unitybank_core::validate_mobile;

/// Notification delivery errors. Separate from the ledger taxonomy: a
/// failed notification is not a failed operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("invalid contact: must be a 10-digit mobile number")]
    InvalidContact,

    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
}

/// A channel that can deliver a textual message to a contact.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt delivery; return a descriptive failure on error.
    async fn send(&self, contact: &str, message: &str) -> Result<(), NotifyError>;
}

/// Delivery stand-in that writes the message to the log. Takes the place of
/// the real messaging channel in development and tests.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, contact: &str, message: &str) -> Result<(), NotifyError> {
        validate_mobile("contact", contact).map_err(|_| NotifyError::InvalidContact)?;

        info!(contact, "notification sent:\n{}", message);
        Ok(())
    }
}
