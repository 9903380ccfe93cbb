use thiserror::Error;

/// Errors that can occur when interacting with the event store.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// A database error occurred. Constraint violations on insert are
    /// surfaced through this variant unchanged.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A persisted event carries a type tag with no registered decoder.
    /// The whole read for the aggregate fails; partial history is unsafe
    /// to return.
    #[error("Unknown event type tag: {event_type}")]
    UnknownEventType { event_type: String },
}

/// Result type for event store operations.
pub type Result<T> = std::result::Result<T, EventStoreError>;
