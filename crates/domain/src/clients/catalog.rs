//! Catalog client trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{CallContext, Money, ProductId};

use super::ClientError;

/// Authoritative product attributes as served by the catalog.
///
/// The unit price is already converted to cents; the decimal-to-cents
/// rounding happens inside the adapters, once, when the catalog
/// response is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// The product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in cents.
    pub unit_price: Money,
    /// Product image URL.
    pub image_url: String,
}

/// Trait for catalog lookups.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches a product by ID. Returns `None` when the catalog has no
    /// such product.
    async fn product(
        &self,
        ctx: &CallContext,
        product_id: &ProductId,
    ) -> Result<Option<Product>, ClientError>;
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<ProductId, Product>,
    fail: bool,
}

/// In-memory catalog client for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogClient {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalogClient {
    /// Creates a new empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product priced in decimal major units, converting to
    /// cents the same way the HTTP adapter does.
    pub fn insert_product(
        &self,
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: f64,
        image_url: impl Into<String>,
    ) {
        let product = Product {
            id: id.into(),
            name: name.into(),
            unit_price: Money::from_major_units(unit_price),
            image_url: image_url.into(),
        };
        self.state
            .write()
            .unwrap()
            .products
            .insert(product.id.clone(), product);
    }

    /// Configures the client to fail on the next call.
    pub fn set_fail(&self, fail: bool) {
        self.state.write().unwrap().fail = fail;
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalogClient {
    async fn product(
        &self,
        _ctx: &CallContext,
        product_id: &ProductId,
    ) -> Result<Option<Product>, ClientError> {
        let state = self.state.read().unwrap();

        if state.fail {
            return Err(ClientError::Transport {
                service: "catalog",
                reason: "connection refused".to_string(),
            });
        }

        Ok(state.products.get(product_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_known_product() {
        let catalog = InMemoryCatalogClient::new();
        catalog.insert_product("SKU-001", "Widget", 10.0, "https://img.example/w.png");

        let ctx = CallContext::new("user-1");
        let product = catalog
            .product(&ctx, &ProductId::new("SKU-001"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(product.name, "Widget");
        assert_eq!(product.unit_price.cents(), 1000);
    }

    #[tokio::test]
    async fn test_lookup_unknown_product_returns_none() {
        let catalog = InMemoryCatalogClient::new();
        let ctx = CallContext::new("user-1");

        let product = catalog
            .product(&ctx, &ProductId::new("SKU-404"))
            .await
            .unwrap();
        assert!(product.is_none());
    }

    #[tokio::test]
    async fn test_fail_flag_surfaces_transport_error() {
        let catalog = InMemoryCatalogClient::new();
        catalog.insert_product("SKU-001", "Widget", 10.0, "");
        catalog.set_fail(true);

        let ctx = CallContext::new("user-1");
        let result = catalog.product(&ctx, &ProductId::new("SKU-001")).await;
        assert!(matches!(result, Err(ClientError::Transport { .. })));
    }
}
