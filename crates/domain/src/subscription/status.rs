//! Subscription status state machine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The status of a subscription in its lifecycle.
///
/// State transitions:
/// ```text
/// Trialing ──┬──► Active ◄──► Incomplete
///            │       │            │
///            └───────┴────────────┴──► Canceled
/// ```
///
/// Every transition function is total: each variant defines behavior for
/// each requested transition, either moving to the target variant, staying
/// put (idempotent self-transition), or rejecting with a domain error.
/// Equality and hashing depend only on the variant, never on the
/// subscription it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Free trial period; the subscription has never been billed.
    Trialing,

    /// Paid and in good standing.
    Active,

    /// A payment attempt failed; the subscription awaits settlement.
    Incomplete,

    /// Terminal state; no transition leaves it.
    Canceled,
}

impl SubscriptionStatus {
    /// Requests a transition to Trialing.
    ///
    /// Only a no-op on an already-trialing subscription; trialing is never
    /// re-entered from any other state.
    pub fn trialing(self) -> Result<SubscriptionStatus, DomainError> {
        match self {
            SubscriptionStatus::Trialing => Ok(SubscriptionStatus::Trialing),
            SubscriptionStatus::Active
            | SubscriptionStatus::Incomplete
            | SubscriptionStatus::Canceled => Err(self.rejected(SubscriptionStatus::Trialing)),
        }
    }

    /// Requests a transition to Active.
    pub fn active(self) -> Result<SubscriptionStatus, DomainError> {
        match self {
            SubscriptionStatus::Trialing
            | SubscriptionStatus::Active
            | SubscriptionStatus::Incomplete => Ok(SubscriptionStatus::Active),
            SubscriptionStatus::Canceled => Err(self.rejected(SubscriptionStatus::Active)),
        }
    }

    /// Requests a transition to Incomplete.
    pub fn incomplete(self) -> Result<SubscriptionStatus, DomainError> {
        match self {
            SubscriptionStatus::Trialing
            | SubscriptionStatus::Active
            | SubscriptionStatus::Incomplete => Ok(SubscriptionStatus::Incomplete),
            SubscriptionStatus::Canceled => Err(self.rejected(SubscriptionStatus::Incomplete)),
        }
    }

    /// Requests a transition to Canceled. Legal from every state.
    pub fn cancel(self) -> Result<SubscriptionStatus, DomainError> {
        Ok(SubscriptionStatus::Canceled)
    }

    /// Returns the persistence discriminator for this variant.
    ///
    /// The same lowercase tokens appear in error messages and must
    /// round-trip through `FromStr` exactly.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::Canceled => "canceled",
        }
    }

    fn rejected(self, requested: SubscriptionStatus) -> DomainError {
        DomainError::InvalidTransition {
            current: self,
            requested,
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trialing" => Ok(SubscriptionStatus::Trialing),
            "active" => Ok(SubscriptionStatus::Active),
            "incomplete" => Ok(SubscriptionStatus::Incomplete),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            other => Err(DomainError::validation(format!(
                "'{other}' is not a valid subscription status"
            ))),
        }
    }
}
