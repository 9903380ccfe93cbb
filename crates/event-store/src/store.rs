use async_trait::async_trait;
use serde::Serialize;

use crate::Result;

/// Contract every persistable domain event implements.
///
/// Domain events represent facts that have happened in the domain. They
/// are immutable, named in past tense, and expose enough identity for the
/// store to key and tag them.
pub trait DomainEvent: Serialize + Send + Sync {
    /// Stable discriminator of the concrete event variant.
    ///
    /// Stored as the row's `event_type` tag and used to select the decoder
    /// on read. Must never change once events with this tag are persisted.
    fn event_type(&self) -> &'static str;

    /// Identifier of the aggregate this event belongs to.
    fn aggregate_id(&self) -> &str;

    /// Kind of the owning aggregate (e.g. "Subscription").
    fn aggregate_type(&self) -> &'static str;
}

/// Core trait for event store implementations.
///
/// An event store appends domain events durably and replays them per
/// aggregate. All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait EventStore<E: DomainEvent>: Send + Sync {
    /// Retrieves all events persisted for one aggregate.
    ///
    /// Rows are matched on both `aggregate_id` and `aggregate_type`, and
    /// each payload is decoded via the row's own `event_type` tag. Events
    /// are returned in append order (`event_id` ascending). An unknown tag
    /// fails the whole read.
    async fn all_events_of_aggregate(
        &self,
        aggregate_id: &str,
        aggregate_type: &str,
    ) -> Result<Vec<E>>;

    /// Appends events to the store, one row per event.
    ///
    /// Each row gets `processed = false` and an append-time `event_date`.
    /// Inserts are independent sequential statements; the surrounding
    /// transaction, if any, is the caller's responsibility. Constraint
    /// violations propagate to the caller unchanged.
    async fn save_all(&self, events: &[E]) -> Result<()>;
}
