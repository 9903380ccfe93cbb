//! Subscription domain events.
//!
//! Each event is an immutable fact record capturing the aggregate snapshot
//! at the moment of a transition. Events are validated at construction and
//! never mutated afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use common::{AccountId, PlanId, SubscriptionId};
use event_store::{DomainEvent, EventRegistry};
use serde::{Deserialize, Serialize};

use super::{Plan, Subscription, aggregate::AGGREGATE_TYPE, assert_not_empty};
use crate::error::DomainError;

/// A subscription entered its trial period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionCreated {
    pub subscription_id: SubscriptionId,
    pub account_id: AccountId,
    pub plan_id: PlanId,
    pub occurred_on: DateTime<Utc>,
}

impl SubscriptionCreated {
    /// Creates the event, rejecting empty identifiers.
    pub fn new(
        subscription_id: SubscriptionId,
        account_id: AccountId,
        plan_id: PlanId,
        occurred_on: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        assert_not_empty(subscription_id.as_str(), "subscriptionId")?;
        assert_not_empty(account_id.as_str(), "accountId")?;
        Ok(Self {
            subscription_id,
            account_id,
            plan_id,
            occurred_on,
        })
    }

    pub(crate) fn from_subscription(subscription: &Subscription) -> Result<Self, DomainError> {
        Self::new(
            subscription.id().clone(),
            subscription.account_id().clone(),
            subscription.plan_id(),
            Utc::now(),
        )
    }
}

/// A subscription was terminated by its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionCanceled {
    pub subscription_id: SubscriptionId,
    pub account_id: AccountId,
    pub plan_id: PlanId,
    pub occurred_on: DateTime<Utc>,
}

impl SubscriptionCanceled {
    /// Creates the event, rejecting empty identifiers.
    pub fn new(
        subscription_id: SubscriptionId,
        account_id: AccountId,
        plan_id: PlanId,
        occurred_on: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        assert_not_empty(subscription_id.as_str(), "subscriptionId")?;
        assert_not_empty(account_id.as_str(), "accountId")?;
        Ok(Self {
            subscription_id,
            account_id,
            plan_id,
            occurred_on,
        })
    }

    pub(crate) fn from_subscription(subscription: &Subscription) -> Result<Self, DomainError> {
        Self::new(
            subscription.id().clone(),
            subscription.account_id().clone(),
            subscription.plan_id(),
            Utc::now(),
        )
    }
}

/// A payment attempt failed and the subscription awaits settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionIncomplete {
    pub subscription_id: SubscriptionId,
    pub account_id: AccountId,
    pub plan_id: PlanId,
    pub reason: String,
    pub due_date: NaiveDate,
    pub occurred_on: DateTime<Utc>,
}

impl SubscriptionIncomplete {
    /// Creates the event, rejecting empty identifiers and an empty reason.
    pub fn new(
        subscription_id: SubscriptionId,
        account_id: AccountId,
        plan_id: PlanId,
        reason: impl Into<String>,
        due_date: NaiveDate,
        occurred_on: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let reason = reason.into();
        assert_not_empty(subscription_id.as_str(), "subscriptionId")?;
        assert_not_empty(account_id.as_str(), "accountId")?;
        assert_not_empty(&reason, "reason")?;
        Ok(Self {
            subscription_id,
            account_id,
            plan_id,
            reason,
            due_date,
            occurred_on,
        })
    }

    pub(crate) fn from_subscription(
        subscription: &Subscription,
        reason: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::new(
            subscription.id().clone(),
            subscription.account_id().clone(),
            subscription.plan_id(),
            reason,
            subscription.due_date(),
            Utc::now(),
        )
    }
}

/// A payment settled and the subscription rolled forward one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRenewed {
    pub subscription_id: SubscriptionId,
    pub account_id: AccountId,
    pub plan_id: PlanId,
    pub transaction_id: String,
    pub price: super::Money,
    pub due_date: NaiveDate,
    pub occurred_on: DateTime<Utc>,
}

impl SubscriptionRenewed {
    /// Creates the event, rejecting empty identifiers and an empty
    /// transaction reference.
    pub fn new(
        subscription_id: SubscriptionId,
        account_id: AccountId,
        plan_id: PlanId,
        transaction_id: impl Into<String>,
        price: super::Money,
        due_date: NaiveDate,
        occurred_on: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let transaction_id = transaction_id.into();
        assert_not_empty(subscription_id.as_str(), "subscriptionId")?;
        assert_not_empty(account_id.as_str(), "accountId")?;
        assert_not_empty(&transaction_id, "transactionId")?;
        Ok(Self {
            subscription_id,
            account_id,
            plan_id,
            transaction_id,
            price,
            due_date,
            occurred_on,
        })
    }

    pub(crate) fn from_subscription(
        subscription: &Subscription,
        selected_plan: &Plan,
        transaction_id: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::new(
            subscription.id().clone(),
            subscription.account_id().clone(),
            selected_plan.id(),
            transaction_id,
            selected_plan.price(),
            subscription.due_date(),
            Utc::now(),
        )
    }
}

/// Closed set of facts the subscription aggregate can emit.
///
/// Serializes untagged: the store persists the bare fact record and tags
/// the row with [`DomainEvent::event_type`], which the registry uses to
/// pick the decoder on read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SubscriptionEvent {
    Created(SubscriptionCreated),
    Incomplete(SubscriptionIncomplete),
    Renewed(SubscriptionRenewed),
    Canceled(SubscriptionCanceled),
}

impl SubscriptionEvent {
    /// Builds the decode registry covering every variant of this closed set.
    pub fn registry() -> EventRegistry<SubscriptionEvent> {
        EventRegistry::new()
            .register("SubscriptionCreated", |data| {
                serde_json::from_slice::<SubscriptionCreated>(data).map(SubscriptionEvent::Created)
            })
            .register("SubscriptionIncomplete", |data| {
                serde_json::from_slice::<SubscriptionIncomplete>(data)
                    .map(SubscriptionEvent::Incomplete)
            })
            .register("SubscriptionRenewed", |data| {
                serde_json::from_slice::<SubscriptionRenewed>(data).map(SubscriptionEvent::Renewed)
            })
            .register("SubscriptionCanceled", |data| {
                serde_json::from_slice::<SubscriptionCanceled>(data)
                    .map(SubscriptionEvent::Canceled)
            })
    }

    /// Returns when the fact occurred, regardless of variant.
    pub fn occurred_on(&self) -> DateTime<Utc> {
        match self {
            SubscriptionEvent::Created(e) => e.occurred_on,
            SubscriptionEvent::Incomplete(e) => e.occurred_on,
            SubscriptionEvent::Renewed(e) => e.occurred_on,
            SubscriptionEvent::Canceled(e) => e.occurred_on,
        }
    }
}

impl DomainEvent for SubscriptionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SubscriptionEvent::Created(_) => "SubscriptionCreated",
            SubscriptionEvent::Incomplete(_) => "SubscriptionIncomplete",
            SubscriptionEvent::Renewed(_) => "SubscriptionRenewed",
            SubscriptionEvent::Canceled(_) => "SubscriptionCanceled",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            SubscriptionEvent::Created(e) => e.subscription_id.as_str(),
            SubscriptionEvent::Incomplete(e) => e.subscription_id.as_str(),
            SubscriptionEvent::Renewed(e) => e.subscription_id.as_str(),
            SubscriptionEvent::Canceled(e) => e.subscription_id.as_str(),
        }
    }

    fn aggregate_type(&self) -> &'static str {
        AGGREGATE_TYPE
    }
}

impl From<SubscriptionCreated> for SubscriptionEvent {
    fn from(event: SubscriptionCreated) -> Self {
        SubscriptionEvent::Created(event)
    }
}

impl From<SubscriptionIncomplete> for SubscriptionEvent {
    fn from(event: SubscriptionIncomplete) -> Self {
        SubscriptionEvent::Incomplete(event)
    }
}

impl From<SubscriptionRenewed> for SubscriptionEvent {
    fn from(event: SubscriptionRenewed) -> Self {
        SubscriptionEvent::Renewed(event)
    }
}

impl From<SubscriptionCanceled> for SubscriptionEvent {
    fn from(event: SubscriptionCanceled) -> Self {
        SubscriptionEvent::Canceled(event)
    }
}
