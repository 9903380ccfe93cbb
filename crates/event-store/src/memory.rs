use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    EventRegistry, Result, StoredEvent,
    store::{DomainEvent, EventStore},
};

/// In-memory event store implementation for testing.
///
/// Rows are kept in their serialized form and decoded through the same
/// registry as the PostgreSQL implementation, so tests exercise the exact
/// polymorphic decode path.
pub struct InMemoryEventStore<E> {
    rows: Arc<RwLock<Vec<StoredEvent>>>,
    registry: Arc<EventRegistry<E>>,
}

impl<E> InMemoryEventStore<E> {
    /// Creates an empty in-memory event store with the given registry.
    pub fn new(registry: EventRegistry<E>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            registry: Arc::new(registry),
        }
    }

    /// Returns the total number of rows stored.
    pub async fn event_count(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns a copy of every persisted row, in append order.
    pub async fn records(&self) -> Vec<StoredEvent> {
        self.rows.read().await.clone()
    }

    /// Inserts a raw row directly, bypassing serialization.
    ///
    /// Test hook for simulating rows written by other processes, including
    /// rows with tags this registry does not know.
    pub async fn insert_raw(&self, mut record: StoredEvent) {
        let mut rows = self.rows.write().await;
        record.event_id = Some(rows.len() as i64 + 1);
        rows.push(record);
    }

    /// Clears all rows.
    pub async fn clear(&self) {
        self.rows.write().await.clear();
    }
}

impl<E> Clone for InMemoryEventStore<E> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            registry: Arc::clone(&self.registry),
        }
    }
}

#[async_trait]
impl<E: DomainEvent> EventStore<E> for InMemoryEventStore<E> {
    async fn all_events_of_aggregate(
        &self,
        aggregate_id: &str,
        aggregate_type: &str,
    ) -> Result<Vec<E>> {
        let rows = self.rows.read().await;

        let mut matching: Vec<&StoredEvent> = rows
            .iter()
            .filter(|r| r.aggregate_id == aggregate_id && r.aggregate_type == aggregate_type)
            .collect();
        matching.sort_by_key(|r| r.event_id);

        matching
            .into_iter()
            .map(|r| self.registry.decode(&r.event_type, &r.event_data))
            .collect()
    }

    async fn save_all(&self, events: &[E]) -> Result<()> {
        for event in events {
            let data = serde_json::to_vec(event)?;
            let mut record = StoredEvent::new_event(
                event.aggregate_id().to_string(),
                event.aggregate_type(),
                event.event_type(),
                data,
            );

            let mut rows = self.rows.write().await;
            record.event_id = Some(rows.len() as i64 + 1);
            rows.push(record);
        }

        Ok(())
    }
}
