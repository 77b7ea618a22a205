//! Cart operation error taxonomy.

use cart_store::StoreError;
use thiserror::Error;

use crate::clients::ClientError;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity is zero or negative.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: i32 },

    /// The catalog has no such product (or returned a mismatched id).
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// The inventory service reported the quantity as unavailable.
    /// Carries the collaborator's message so the caller can show it.
    #[error("{message}")]
    InsufficientStock { message: String },

    /// The product has no line in the user's cart.
    #[error("Item not found in cart: {product_id}")]
    ItemNotFound { product_id: String },

    /// A required collaborator (catalog, inventory) was unreachable
    /// during a mutation. The operation was aborted with no write.
    #[error("Collaborator unavailable: {0}")]
    Collaborator(#[from] ClientError),

    /// Cart store error, including a concurrency conflict that survived
    /// the bounded retry loop.
    #[error("Cart store error: {0}")]
    Store(#[from] StoreError),
}
