pub mod types;

pub use types::{AccountId, PlanId, SubscriptionId};
