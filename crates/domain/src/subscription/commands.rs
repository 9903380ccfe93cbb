//! Subscription commands.

use super::{Plan, SubscriptionStatus};

/// A request to change subscription state, applied synchronously by
/// [`Subscription::execute`](super::Subscription::execute).
///
/// Commands are transient inputs and are never persisted.
#[derive(Debug, Clone)]
pub enum SubscriptionCommand {
    /// Administrative override: replaces the status directly, bypassing the
    /// transition table. Registers no event.
    ChangeStatus {
        /// The status to force.
        status: SubscriptionStatus,
    },

    /// A payment attempt failed; the subscription becomes incomplete.
    IncompleteSubscription {
        /// Reference of the failed payment transaction.
        transaction_id: String,

        /// Why the payment did not settle.
        reason: String,
    },

    /// A payment settled; the subscription renews for another month.
    RenewSubscription {
        /// Reference of the settled payment transaction.
        transaction_id: String,

        /// The plan the subscription renews onto.
        selected_plan: Plan,
    },

    /// The subscriber walked away; the subscription terminates.
    CancelSubscription,
}

impl SubscriptionCommand {
    /// Creates a ChangeStatus command.
    pub fn change_status(status: SubscriptionStatus) -> Self {
        SubscriptionCommand::ChangeStatus { status }
    }

    /// Creates an IncompleteSubscription command.
    pub fn incomplete(transaction_id: impl Into<String>, reason: impl Into<String>) -> Self {
        SubscriptionCommand::IncompleteSubscription {
            transaction_id: transaction_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a RenewSubscription command.
    pub fn renew(transaction_id: impl Into<String>, selected_plan: Plan) -> Self {
        SubscriptionCommand::RenewSubscription {
            transaction_id: transaction_id.into(),
            selected_plan,
        }
    }

    /// Creates a CancelSubscription command.
    pub fn cancel() -> Self {
        SubscriptionCommand::CancelSubscription
    }
}
