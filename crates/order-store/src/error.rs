use thiserror::Error;

use crate::OrderId;

/// Errors that can occur when interacting with the order, cart or session store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An order with the same identifier already exists.
    #[error("Duplicate order: {0}")]
    DuplicateOrder(OrderId),

    /// A stored row could not be decoded into a record.
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    /// The initial connection did not complete in time.
    #[error("Timed out connecting to the database after {0:?}")]
    ConnectTimeout(std::time::Duration),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
