use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A domain event as it sits in the `events` table.
///
/// The record wraps an opaque serialized payload with the metadata needed
/// to find it again (aggregate keys) and to reconstruct its concrete type
/// (the `event_type` tag).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Store-assigned sequence number; absent until the row is inserted.
    pub event_id: Option<i64>,

    /// Whether a downstream consumer has handled this event.
    ///
    /// Always false at append time. The store never flips it; only the
    /// external consumer does.
    pub processed: bool,

    /// Identifier of the owning aggregate.
    pub aggregate_id: String,

    /// Kind of the owning aggregate (e.g. "Subscription").
    pub aggregate_type: String,

    /// Discriminator of the concrete event variant, used to select the
    /// decoder on read.
    pub event_type: String,

    /// Assigned at append time, not taken from the event payload.
    pub event_date: DateTime<Utc>,

    /// Opaque serialized payload.
    pub event_data: Vec<u8>,
}

impl StoredEvent {
    /// Builds a fresh, not-yet-persisted record for an event being appended.
    pub fn new_event(
        aggregate_id: impl Into<String>,
        aggregate_type: impl Into<String>,
        event_type: impl Into<String>,
        event_data: Vec<u8>,
    ) -> Self {
        Self {
            event_id: None,
            processed: false,
            aggregate_id: aggregate_id.into(),
            aggregate_type: aggregate_type.into(),
            event_type: event_type.into(),
            event_date: Utc::now(),
            event_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_event_starts_unprocessed_and_unassigned() {
        let record = StoredEvent::new_event("SUB-1", "Subscription", "SubscriptionCreated", vec![]);

        assert_eq!(record.event_id, None);
        assert!(!record.processed);
        assert_eq!(record.aggregate_id, "SUB-1");
        assert_eq!(record.aggregate_type, "Subscription");
        assert_eq!(record.event_type, "SubscriptionCreated");
    }

    #[test]
    fn new_event_assigns_append_timestamp() {
        let before = Utc::now();
        let record = StoredEvent::new_event("SUB-1", "Subscription", "SubscriptionCreated", vec![]);
        let after = Utc::now();

        assert!(record.event_date >= before);
        assert!(record.event_date <= after);
    }
}
