//! The subscription aggregate root.

use chrono::{DateTime, Months, NaiveDate, Utc};
use common::{AccountId, PlanId, SubscriptionId};

use super::events::{
    SubscriptionCanceled, SubscriptionCreated, SubscriptionEvent, SubscriptionIncomplete,
    SubscriptionRenewed,
};
use super::{Plan, SubscriptionCommand, SubscriptionStatus, assert_not_empty};
use crate::error::DomainError;

/// Discriminator stored alongside every event row of this aggregate.
pub const AGGREGATE_TYPE: &str = "Subscription";

/// A customer's subscription to a billing plan.
///
/// State changes go through [`Subscription::execute`], which applies commands
/// in order and registers the resulting events. Events accumulate in the
/// aggregate until drained with [`Subscription::take_pending_events`];
/// persisting them is the gateway's job, not the aggregate's.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: SubscriptionId,
    version: i32,
    account_id: AccountId,
    plan_id: PlanId,
    due_date: NaiveDate,
    status: SubscriptionStatus,
    last_renew_date: Option<DateTime<Utc>>,
    last_transaction_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    pending_events: Vec<SubscriptionEvent>,
}

impl Subscription {
    /// Opens a new trialing subscription on the given plan.
    ///
    /// The trial runs for one month; a `SubscriptionCreated` event is
    /// registered immediately.
    pub fn new_subscription(
        id: SubscriptionId,
        account_id: AccountId,
        plan: &Plan,
    ) -> Result<Self, DomainError> {
        let now = Utc::now();
        let due_date = month_later(now.date_naive())?;

        let mut subscription = Self {
            id,
            version: 0,
            account_id,
            plan_id: plan.id(),
            due_date,
            status: SubscriptionStatus::Trialing,
            last_renew_date: None,
            last_transaction_id: None,
            created_at: now,
            updated_at: now,
            pending_events: Vec::new(),
        };
        assert_not_empty(subscription.id.as_str(), "subscriptionId")?;
        assert_not_empty(subscription.account_id.as_str(), "accountId")?;

        let event = SubscriptionCreated::from_subscription(&subscription)?;
        subscription.register_event(event.into());
        Ok(subscription)
    }

    /// Rehydrates a subscription from its persisted columns.
    ///
    /// No transition rules run and no event is registered; the stored state
    /// is taken as-is.
    #[allow(clippy::too_many_arguments)]
    pub fn with(
        id: SubscriptionId,
        version: i32,
        account_id: AccountId,
        plan_id: PlanId,
        due_date: NaiveDate,
        status: &str,
        last_renew_date: Option<DateTime<Utc>>,
        last_transaction_id: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        assert_not_empty(id.as_str(), "subscriptionId")?;
        assert_not_empty(account_id.as_str(), "accountId")?;
        let status = status.parse::<SubscriptionStatus>()?;

        Ok(Self {
            id,
            version,
            account_id,
            plan_id,
            due_date,
            status,
            last_renew_date,
            last_transaction_id,
            created_at,
            updated_at,
            pending_events: Vec::new(),
        })
    }

    /// Applies the commands in order, failing fast on the first error.
    ///
    /// Commands applied before the failing one keep their effects; the
    /// caller must discard the aggregate on error. When a non-empty batch
    /// succeeds, `updated_at` is bumped exactly once.
    pub fn execute(
        &mut self,
        commands: impl IntoIterator<Item = SubscriptionCommand>,
    ) -> Result<(), DomainError> {
        let mut applied_any = false;
        for command in commands {
            self.apply(command)?;
            applied_any = true;
        }
        if applied_any {
            self.updated_at = Utc::now();
        }
        Ok(())
    }

    fn apply(&mut self, command: SubscriptionCommand) -> Result<(), DomainError> {
        match command {
            SubscriptionCommand::ChangeStatus { status } => {
                self.status = status;
                Ok(())
            }
            SubscriptionCommand::IncompleteSubscription {
                transaction_id,
                reason,
            } => self.apply_incomplete(transaction_id, reason),
            SubscriptionCommand::RenewSubscription {
                transaction_id,
                selected_plan,
            } => self.apply_renew(transaction_id, &selected_plan),
            SubscriptionCommand::CancelSubscription => self.apply_cancel(),
        }
    }

    fn apply_cancel(&mut self) -> Result<(), DomainError> {
        let next = self.status.cancel()?;
        // Canceling an already-canceled subscription is a no-op fact-wise.
        if next == self.status {
            return Ok(());
        }
        self.status = next;
        let event = SubscriptionCanceled::from_subscription(self)?;
        self.register_event(event.into());
        Ok(())
    }

    fn apply_renew(&mut self, transaction_id: String, selected_plan: &Plan) -> Result<(), DomainError> {
        self.status = self.status.active()?;
        self.due_date = month_later(self.due_date)?;
        self.plan_id = selected_plan.id();
        self.last_renew_date = Some(Utc::now());
        self.last_transaction_id = Some(transaction_id.clone());

        let event = SubscriptionRenewed::from_subscription(self, selected_plan, transaction_id)?;
        self.register_event(event.into());
        Ok(())
    }

    fn apply_incomplete(&mut self, transaction_id: String, reason: String) -> Result<(), DomainError> {
        self.status = self.status.incomplete()?;
        self.last_transaction_id = Some(transaction_id);

        let event = SubscriptionIncomplete::from_subscription(self, reason)?;
        self.register_event(event.into());
        Ok(())
    }

    fn register_event(&mut self, event: SubscriptionEvent) {
        self.pending_events.push(event);
    }

    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn plan_id(&self) -> PlanId {
        self.plan_id
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }

    pub fn last_renew_date(&self) -> Option<DateTime<Utc>> {
        self.last_renew_date
    }

    pub fn last_transaction_id(&self) -> Option<&str> {
        self.last_transaction_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// True while the subscription is in its trial period.
    pub fn is_trial(&self) -> bool {
        self.status == SubscriptionStatus::Trialing
    }

    /// True only when the subscription is paid and in good standing; a
    /// trialing subscription is not active.
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// Events registered since construction or the last drain.
    pub fn pending_events(&self) -> &[SubscriptionEvent] {
        &self.pending_events
    }

    /// Drains the registered events, leaving the aggregate with none.
    pub fn take_pending_events(&mut self) -> Vec<SubscriptionEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

fn month_later(date: NaiveDate) -> Result<NaiveDate, DomainError> {
    date.checked_add_months(Months::new(1))
        .ok_or_else(|| DomainError::validation("due date out of range"))
}
