//! Domain layer for the subscription lifecycle system.
//!
//! This crate provides:
//! - The Subscription aggregate with its batched command entry point
//! - The SubscriptionStatus state machine with an exhaustive transition table
//! - The closed set of subscription domain events and their decode registry
//! - The SubscriptionGateway persistence contract consumed by orchestrators

pub mod error;
pub mod subscription;

pub use error::DomainError;
pub use subscription::{
    Money, Plan, Subscription, SubscriptionCanceled, SubscriptionCommand, SubscriptionCreated,
    SubscriptionEvent, SubscriptionGateway, SubscriptionIncomplete, SubscriptionRenewed,
    SubscriptionStatus,
};
