use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    EventRegistry, Result, StoredEvent,
    store::{DomainEvent, EventStore},
};

/// PostgreSQL-backed event store implementation.
///
/// One row per event in the `events` table. The concrete event type is
/// reconstructed on read from the row's `event_type` tag through the
/// registry supplied at construction.
pub struct PostgresEventStore<E> {
    pool: PgPool,
    registry: EventRegistry<E>,
}

impl<E> PostgresEventStore<E> {
    /// Creates a new PostgreSQL event store.
    pub fn new(pool: PgPool, registry: EventRegistry<E>) -> Self {
        Self { pool, registry }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_record(row: PgRow) -> Result<StoredEvent> {
        Ok(StoredEvent {
            event_id: Some(row.try_get("event_id")?),
            processed: row.try_get("processed")?,
            aggregate_id: row.try_get("aggregate_id")?,
            aggregate_type: row.try_get("aggregate_type")?,
            event_type: row.try_get("event_type")?,
            event_date: row.try_get("event_date")?,
            event_data: row.try_get("event_data")?,
        })
    }
}

impl<E> Clone for PostgresEventStore<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            registry: self.registry.clone(),
        }
    }
}

#[async_trait]
impl<E: DomainEvent> EventStore<E> for PostgresEventStore<E> {
    #[tracing::instrument(skip(self))]
    async fn all_events_of_aggregate(
        &self,
        aggregate_id: &str,
        aggregate_type: &str,
    ) -> Result<Vec<E>> {
        let rows = sqlx::query(
            r#"
            SELECT event_id, processed, aggregate_id, aggregate_type, event_type, event_date, event_data
            FROM events
            WHERE aggregate_id = $1 AND aggregate_type = $2
            ORDER BY event_id ASC
            "#,
        )
        .bind(aggregate_id)
        .bind(aggregate_type)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let record = Self::row_to_record(row)?;
                self.registry.decode(&record.event_type, &record.event_data)
            })
            .collect()
    }

    #[tracing::instrument(skip(self, events), fields(count = events.len()))]
    async fn save_all(&self, events: &[E]) -> Result<()> {
        // Independent sequential inserts; the surrounding transaction, if
        // any, belongs to the caller.
        for event in events {
            let record = StoredEvent::new_event(
                event.aggregate_id().to_string(),
                event.aggregate_type(),
                event.event_type(),
                serde_json::to_vec(event)?,
            );

            sqlx::query(
                r#"
                INSERT INTO events (processed, aggregate_id, aggregate_type, event_type, event_date, event_data)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(record.processed)
            .bind(&record.aggregate_id)
            .bind(&record.aggregate_type)
            .bind(&record.event_type)
            .bind(record.event_date)
            .bind(&record.event_data)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }
}
