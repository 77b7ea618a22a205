//! Checkout initiation error types.

use domain::CartError;
use thiserror::Error;

use crate::publisher::PublishError;

/// Errors that can occur during checkout initiation.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The user's cart is empty or does not exist; there is nothing to
    /// check out.
    #[error("Cart is empty or not found")]
    EmptyCart,

    /// The cart read failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// The saga-initiating event could not be published. The whole
    /// attempt fails; a retry mints a fresh saga ID.
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    /// The event payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
