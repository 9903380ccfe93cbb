//! Persistence boundary for the subscription aggregate.

use async_trait::async_trait;
use common::AccountId;

use super::Subscription;
use crate::error::DomainError;

/// Outbound port the application drives subscription persistence through.
///
/// Implementations sit in the infrastructure layer; they typically write
/// the aggregate's current state and append its drained events to the
/// event store in the same unit of work.
#[async_trait]
pub trait SubscriptionGateway: Send + Sync {
    /// Returns the most recently created subscription of the account, if any.
    async fn latest_subscription_of_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Subscription>, DomainError>;

    /// Persists the aggregate state and its pending events, returning the
    /// stored subscription.
    async fn save(&self, subscription: Subscription) -> Result<Subscription, DomainError>;
}
