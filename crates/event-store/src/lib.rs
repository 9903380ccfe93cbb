pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod registry;
pub mod store;

pub use error::{EventStoreError, Result};
pub use memory::InMemoryEventStore;
pub use postgres::PostgresEventStore;
pub use record::StoredEvent;
pub use registry::EventRegistry;
pub use store::{DomainEvent, EventStore};
