//! In-memory cart store for tests and local runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::UserId;
use tokio::sync::RwLock;

use crate::{Cart, CartStore, Result, StoreError};

/// In-memory cart store implementation.
///
/// Stores carts in a map keyed by user and provides the same
/// compare-and-swap semantics as the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryCartStore {
    carts: Arc<RwLock<HashMap<UserId, Cart>>>,
}

impl InMemoryCartStore {
    /// Creates a new empty in-memory cart store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cart rows stored.
    pub async fn cart_count(&self) -> usize {
        self.carts.read().await.len()
    }

    /// Clears all carts.
    pub async fn clear(&self) {
        self.carts.write().await.clear();
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Cart>> {
        Ok(self.carts.read().await.get(user_id).cloned())
    }

    async fn create(&self, cart: Cart) -> Result<Cart> {
        let mut carts = self.carts.write().await;
        if carts.contains_key(&cart.user_id) {
            return Err(StoreError::AlreadyExists(cart.user_id));
        }

        let mut stored = cart;
        stored.version = crate::Version::initial();
        carts.insert(stored.user_id.clone(), stored.clone());
        Ok(stored)
    }

    async fn replace(&self, cart: Cart) -> Result<Cart> {
        let mut carts = self.carts.write().await;
        let current = carts
            .get(&cart.user_id)
            .ok_or_else(|| StoreError::NotFound(cart.user_id.clone()))?;

        if current.version != cart.version {
            return Err(StoreError::ConcurrencyConflict {
                user_id: cart.user_id.clone(),
                expected: cart.version,
                actual: current.version,
            });
        }

        let mut stored = cart;
        stored.version = stored.version.next();
        carts.insert(stored.user_id.clone(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, user_id: &UserId) -> Result<()> {
        self.carts.write().await.remove(user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CartItem, Version};
    use common::Money;

    fn cart_with_widget(user: &str) -> Cart {
        let mut cart = Cart::new(user);
        cart.merge_item(CartItem::new(
            "SKU-001",
            1,
            "Widget",
            Money::from_cents(1000),
            "",
        ));
        cart
    }

    #[tokio::test]
    async fn test_find_missing_cart_returns_none() {
        let store = InMemoryCartStore::new();
        let found = store.find_by_user(&UserId::new("nobody")).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = InMemoryCartStore::new();
        let created = store.create(cart_with_widget("user-1")).await.unwrap();
        assert_eq!(created.version, Version::initial());

        let found = store
            .find_by_user(&UserId::new("user-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, created);
        assert_eq!(store.cart_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_twice_fails() {
        let store = InMemoryCartStore::new();
        store.create(cart_with_widget("user-1")).await.unwrap();

        let result = store.create(cart_with_widget("user-1")).await;
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_replace_bumps_version() {
        let store = InMemoryCartStore::new();
        let created = store.create(cart_with_widget("user-1")).await.unwrap();

        let mut updated = created.clone();
        updated.merge_item(CartItem::new(
            "SKU-002",
            2,
            "Gadget",
            Money::from_cents(500),
            "",
        ));
        let stored = store.replace(updated).await.unwrap();

        assert_eq!(stored.version, created.version.next());
        assert_eq!(stored.item_count(), 2);
    }

    #[tokio::test]
    async fn test_replace_with_stale_version_conflicts() {
        let store = InMemoryCartStore::new();
        let created = store.create(cart_with_widget("user-1")).await.unwrap();

        // First writer wins.
        let mut first = created.clone();
        first.merge_item(CartItem::new(
            "SKU-002",
            1,
            "Gadget",
            Money::from_cents(500),
            "",
        ));
        store.replace(first).await.unwrap();

        // Second writer still holds the old version.
        let mut second = created;
        second.remove_item(&common::ProductId::new("SKU-001"));
        let result = store.replace(second).await;

        match result {
            Err(StoreError::ConcurrencyConflict {
                expected, actual, ..
            }) => {
                assert_eq!(expected, Version::initial());
                assert_eq!(actual, Version::initial().next());
            }
            other => panic!("expected concurrency conflict, got {other:?}"),
        }

        // The first writer's state survived.
        let found = store
            .find_by_user(&UserId::new("user-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.item_count(), 2);
    }

    #[tokio::test]
    async fn test_replace_missing_cart_fails() {
        let store = InMemoryCartStore::new();
        let result = store.replace(cart_with_widget("user-1")).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let store = InMemoryCartStore::new();
        store.create(cart_with_widget("user-1")).await.unwrap();

        store.delete(&UserId::new("user-1")).await.unwrap();
        assert_eq!(store.cart_count().await, 0);

        // Deleting an absent row is not an error.
        store.delete(&UserId::new("user-1")).await.unwrap();
    }
}
