//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p event-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use event_store::{
    DomainEvent, EventRegistry, EventStore, EventStoreError, PostgresEventStore,
};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_events_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresEventStore<AccountEvent> {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE events")
        .execute(&pool)
        .await
        .unwrap();

    PostgresEventStore::new(pool, registry())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AccountOpened {
    account_id: String,
    occurred_on: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AccountClosed {
    account_id: String,
    reason: String,
    occurred_on: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
enum AccountEvent {
    Opened(AccountOpened),
    Closed(AccountClosed),
}

impl DomainEvent for AccountEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AccountEvent::Opened(_) => "AccountOpened",
            AccountEvent::Closed(_) => "AccountClosed",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            AccountEvent::Opened(e) => &e.account_id,
            AccountEvent::Closed(e) => &e.account_id,
        }
    }

    fn aggregate_type(&self) -> &'static str {
        "Account"
    }
}

fn registry() -> EventRegistry<AccountEvent> {
    EventRegistry::new()
        .register("AccountOpened", |data| {
            serde_json::from_slice::<AccountOpened>(data).map(AccountEvent::Opened)
        })
        .register("AccountClosed", |data| {
            serde_json::from_slice::<AccountClosed>(data).map(AccountEvent::Closed)
        })
}

fn opened(account_id: &str) -> AccountEvent {
    AccountEvent::Opened(AccountOpened {
        account_id: account_id.to_string(),
        occurred_on: Utc::now(),
    })
}

fn closed(account_id: &str, reason: &str) -> AccountEvent {
    AccountEvent::Closed(AccountClosed {
        account_id: account_id.to_string(),
        reason: reason.to_string(),
        occurred_on: Utc::now(),
    })
}

#[tokio::test]
async fn save_and_read_back_roundtrip() {
    let store = get_test_store().await;
    let events = vec![opened("ACC-1"), closed("ACC-1", "fraud")];

    store.save_all(&events).await.unwrap();

    let read = store
        .all_events_of_aggregate("ACC-1", "Account")
        .await
        .unwrap();
    assert_eq!(read, events);
}

#[tokio::test]
async fn read_filters_on_both_aggregate_keys() {
    let store = get_test_store().await;
    store
        .save_all(&[opened("ACC-1"), opened("ACC-2")])
        .await
        .unwrap();

    let read = store
        .all_events_of_aggregate("ACC-1", "Account")
        .await
        .unwrap();
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].aggregate_id(), "ACC-1");

    let wrong_type = store
        .all_events_of_aggregate("ACC-1", "Subscription")
        .await
        .unwrap();
    assert!(wrong_type.is_empty());
}

#[tokio::test]
async fn events_come_back_in_append_order() {
    let store = get_test_store().await;

    store.save_all(&[opened("ACC-1")]).await.unwrap();
    store.save_all(&[closed("ACC-1", "churn")]).await.unwrap();

    let read = store
        .all_events_of_aggregate("ACC-1", "Account")
        .await
        .unwrap();
    assert_eq!(read.len(), 2);
    assert_eq!(read[0].event_type(), "AccountOpened");
    assert_eq!(read[1].event_type(), "AccountClosed");
}

#[tokio::test]
async fn rows_are_tagged_unprocessed_and_timestamped_at_append() {
    let store = get_test_store().await;
    let before = Utc::now();

    store.save_all(&[opened("ACC-1")]).await.unwrap();

    let row = sqlx::query(
        "SELECT event_id, processed, aggregate_type, event_type, event_date FROM events",
    )
    .fetch_one(store.pool())
    .await
    .unwrap();

    let event_id: i64 = row.try_get("event_id").unwrap();
    let processed: bool = row.try_get("processed").unwrap();
    let aggregate_type: String = row.try_get("aggregate_type").unwrap();
    let event_type: String = row.try_get("event_type").unwrap();
    let event_date: DateTime<Utc> = row.try_get("event_date").unwrap();

    assert!(event_id > 0);
    assert!(!processed);
    assert_eq!(aggregate_type, "Account");
    assert_eq!(event_type, "AccountOpened");
    assert!(event_date >= before);
}

#[tokio::test]
async fn unknown_tag_fails_whole_read() {
    let store = get_test_store().await;
    store.save_all(&[opened("ACC-1")]).await.unwrap();

    // A row written by a newer deployment this registry does not know.
    sqlx::query(
        r#"
        INSERT INTO events (processed, aggregate_id, aggregate_type, event_type, event_date, event_data)
        VALUES (FALSE, 'ACC-1', 'Account', 'AccountSuspended', NOW(), '{}')
        "#,
    )
    .execute(store.pool())
    .await
    .unwrap();

    let result = store.all_events_of_aggregate("ACC-1", "Account").await;
    assert!(matches!(
        result,
        Err(EventStoreError::UnknownEventType { event_type }) if event_type == "AccountSuspended"
    ));
}

#[tokio::test]
async fn save_all_with_no_events_inserts_nothing() {
    let store = get_test_store().await;

    store.save_all(&[]).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}
