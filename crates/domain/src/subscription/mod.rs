//! Subscription aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod gateway;
mod plan;
mod status;

pub use aggregate::{AGGREGATE_TYPE, Subscription};
pub use commands::SubscriptionCommand;
pub use events::{
    SubscriptionCanceled, SubscriptionCreated, SubscriptionEvent, SubscriptionIncomplete,
    SubscriptionRenewed,
};
pub use gateway::SubscriptionGateway;
pub use plan::{Money, Plan};
pub use status::SubscriptionStatus;

use crate::error::DomainError;

/// Rejects empty values for required string fields.
///
/// The message format (`'<field>' should not be empty`) is part of the
/// domain contract surfaced to callers.
pub(crate) fn assert_not_empty(value: &str, field: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!(
            "'{field}' should not be empty"
        )));
    }
    Ok(())
}
