use common::UserId;
use thiserror::Error;

use crate::Version;

/// Errors that can occur when interacting with the cart store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A concurrency conflict occurred when replacing a cart.
    /// The version the cart was loaded at no longer matches the row.
    #[error("Concurrency conflict for cart of user {user_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        user_id: UserId,
        expected: Version,
        actual: Version,
    },

    /// A cart already exists for the user.
    #[error("Cart already exists for user {0}")]
    AlreadyExists(UserId),

    /// No cart row exists for the user.
    #[error("No cart found for user {0}")]
    NotFound(UserId),

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

impl StoreError {
    /// Returns true for failures the caller can resolve by re-reading
    /// the cart and reapplying its change.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::ConcurrencyConflict { .. } | StoreError::AlreadyExists(_)
        )
    }
}

/// Result type for cart store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
