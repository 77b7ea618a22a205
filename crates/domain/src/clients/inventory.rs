//! Inventory client trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{CallContext, ProductId};

use super::ClientError;

/// Result of a stock check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAvailability {
    /// Whether the requested quantity can currently be served.
    pub available: bool,
    /// Optional human-readable reason when unavailable.
    pub message: Option<String>,
}

impl StockAvailability {
    /// An available response.
    pub fn available() -> Self {
        Self {
            available: true,
            message: None,
        }
    }

    /// An unavailable response with a reason.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            available: false,
            message: Some(message.into()),
        }
    }
}

/// Trait for inventory availability checks.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Checks whether `quantity` units of a product are available.
    async fn check_stock(
        &self,
        ctx: &CallContext,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<StockAvailability, ClientError>;
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    stock: HashMap<ProductId, u32>,
    fail: bool,
}

/// In-memory inventory client for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryClient {
    state: Arc<RwLock<InMemoryInventoryState>>,
}

impl InMemoryInventoryClient {
    /// Creates a new in-memory inventory with no stock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the on-hand quantity for a product.
    pub fn set_stock(&self, product_id: impl Into<ProductId>, on_hand: u32) {
        self.state
            .write()
            .unwrap()
            .stock
            .insert(product_id.into(), on_hand);
    }

    /// Configures the client to fail on the next call.
    pub fn set_fail(&self, fail: bool) {
        self.state.write().unwrap().fail = fail;
    }
}

#[async_trait]
impl InventoryClient for InMemoryInventoryClient {
    async fn check_stock(
        &self,
        _ctx: &CallContext,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<StockAvailability, ClientError> {
        let state = self.state.read().unwrap();

        if state.fail {
            return Err(ClientError::Transport {
                service: "inventory",
                reason: "connection refused".to_string(),
            });
        }

        let on_hand = state.stock.get(product_id).copied().unwrap_or(0);
        if on_hand >= quantity {
            Ok(StockAvailability::available())
        } else {
            Ok(StockAvailability::unavailable(format!(
                "Only {on_hand} unit(s) of {product_id} in stock"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_check_stock_available() {
        let inventory = InMemoryInventoryClient::new();
        inventory.set_stock("SKU-001", 5);

        let ctx = CallContext::new("user-1");
        let result = inventory
            .check_stock(&ctx, &ProductId::new("SKU-001"), 3)
            .await
            .unwrap();

        assert!(result.available);
        assert!(result.message.is_none());
    }

    #[tokio::test]
    async fn test_check_stock_unavailable_carries_message() {
        let inventory = InMemoryInventoryClient::new();
        inventory.set_stock("SKU-001", 1);

        let ctx = CallContext::new("user-1");
        let result = inventory
            .check_stock(&ctx, &ProductId::new("SKU-001"), 3)
            .await
            .unwrap();

        assert!(!result.available);
        assert_eq!(
            result.message.as_deref(),
            Some("Only 1 unit(s) of SKU-001 in stock")
        );
    }

    #[tokio::test]
    async fn test_unknown_product_has_zero_stock() {
        let inventory = InMemoryInventoryClient::new();

        let ctx = CallContext::new("user-1");
        let result = inventory
            .check_stock(&ctx, &ProductId::new("SKU-404"), 1)
            .await
            .unwrap();

        assert!(!result.available);
    }
}
