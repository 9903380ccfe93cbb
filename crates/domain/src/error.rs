//! Domain error types.

use event_store::EventStoreError;
use thiserror::Error;

use crate::subscription::SubscriptionStatus;

/// Errors that can occur during domain operations.
///
/// `Validation` and `InvalidTransition` are expected domain outcomes for
/// callers to branch on, not programming errors.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A required field was missing or empty at construction time.
    #[error("{message}")]
    Validation { message: String },

    /// The requested transition is illegal for the current status variant.
    #[error("Subscription with status {current} can't transit to {requested}")]
    InvalidTransition {
        current: SubscriptionStatus,
        requested: SubscriptionStatus,
    },

    /// An error occurred in the event store.
    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),
}

impl DomainError {
    /// Creates a validation error with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
        }
    }
}
