//! The cart store trait.

use async_trait::async_trait;
use common::UserId;

use crate::{Cart, Result};

/// Durable keyed storage for one cart aggregate per user.
///
/// Implementations persist the whole cart as a unit. `replace` is a
/// compare-and-swap on [`Cart::version`]: the caller passes back the
/// cart as loaded (plus its in-memory changes), and the store only
/// writes if the row still carries that version, bumping it on success.
/// A mismatch fails with [`crate::StoreError::ConcurrencyConflict`] so
/// the caller can re-read and reapply.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Loads the cart for a user, if one exists.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Cart>>;

    /// Inserts a brand-new cart row.
    ///
    /// Fails with [`crate::StoreError::AlreadyExists`] if the user
    /// already has a cart (e.g. a concurrent first mutation won).
    /// Returns the stored cart.
    async fn create(&self, cart: Cart) -> Result<Cart>;

    /// Replaces the user's cart with the given state, compare-and-swap
    /// on the version it was loaded at. Returns the stored cart with
    /// the bumped version.
    async fn replace(&self, cart: Cart) -> Result<Cart>;

    /// Deletes the user's cart row, if present.
    async fn delete(&self, user_id: &UserId) -> Result<()>;
}
