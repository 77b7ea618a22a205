//! Cart service providing the cart mutation and query operations.

use std::sync::Arc;

use cart_store::{Cart, CartItem, CartStore};
use common::{CallContext, Money, ProductId};

use crate::clients::{
    AddressHint, CatalogClient, DiscountClient, InventoryClient, TaxClient,
};
use crate::details::CartDetails;
use crate::error::CartError;

/// Upper bound on write retries after an optimistic concurrency
/// conflict. Each retry re-reads the cart and reapplies the change.
const MAX_WRITE_ATTEMPTS: usize = 3;

/// Fallback message when the inventory service declines without one.
const OUT_OF_STOCK_MESSAGE: &str = "Product not available in sufficient quantity.";

/// Service for managing a user's cart.
///
/// Mutations validate against the catalog and inventory collaborators
/// before writing; the priced read degrades gracefully when the
/// discount or tax collaborator is down. All writes go through the
/// store's compare-and-swap, retried a bounded number of times.
pub struct CartService<S: CartStore> {
    store: S,
    catalog: Arc<dyn CatalogClient>,
    inventory: Arc<dyn InventoryClient>,
    discount: Arc<dyn DiscountClient>,
    tax: Arc<dyn TaxClient>,
}

impl<S: CartStore> CartService<S> {
    /// Creates a new cart service.
    pub fn new(
        store: S,
        catalog: Arc<dyn CatalogClient>,
        inventory: Arc<dyn InventoryClient>,
        discount: Arc<dyn DiscountClient>,
        tax: Arc<dyn TaxClient>,
    ) -> Self {
        Self {
            store,
            catalog,
            inventory,
            discount,
            tax,
        }
    }

    /// Adds `quantity` units of a product to the user's cart, creating
    /// the cart on first use.
    ///
    /// The line item snapshots the catalog's current name, price, and
    /// image. If the product is already in the cart only its quantity
    /// grows; the existing snapshot wins. Deliberately not idempotent:
    /// two identical calls are two add intents and double the quantity.
    #[tracing::instrument(skip(self, ctx), fields(user_id = %ctx.user_id()))]
    pub async fn add_item(
        &self,
        ctx: &CallContext,
        product_id: &ProductId,
        quantity: i32,
    ) -> Result<Cart, CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }
        let quantity = quantity as u32;

        let product = self
            .catalog
            .product(ctx, product_id)
            .await?
            .filter(|p| &p.id == product_id)
            .ok_or_else(|| CartError::ProductNotFound {
                product_id: product_id.to_string(),
            })?;

        let stock = self.inventory.check_stock(ctx, product_id, quantity).await?;
        if !stock.available {
            return Err(CartError::InsufficientStock {
                message: stock
                    .message
                    .unwrap_or_else(|| OUT_OF_STOCK_MESSAGE.to_string()),
            });
        }

        let item = CartItem::new(
            product.id,
            quantity,
            product.name,
            product.unit_price,
            product.image_url,
        );

        let mut attempts = 0;
        loop {
            attempts += 1;

            let result = match self.store.find_by_user(ctx.user_id()).await? {
                Some(mut cart) => {
                    cart.merge_item(item.clone());
                    cart.touch();
                    self.store.replace(cart).await
                }
                None => {
                    let mut cart = Cart::new(ctx.user_id().clone());
                    cart.merge_item(item.clone());
                    self.store.create(cart).await
                }
            };

            match result {
                Ok(cart) => {
                    metrics::counter!("cart_mutations_total", "operation" => "add_item")
                        .increment(1);
                    return Ok(cart);
                }
                Err(e) if e.is_retryable() && attempts < MAX_WRITE_ATTEMPTS => {
                    metrics::counter!("cart_replace_conflicts_total").increment(1);
                    tracing::warn!(attempt = attempts, error = %e, "cart write conflict, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Sets the absolute quantity of a line already in the cart.
    ///
    /// A zero or negative quantity removes the line instead. Stock is
    /// re-validated for the new absolute quantity, not the delta.
    #[tracing::instrument(skip(self, ctx), fields(user_id = %ctx.user_id()))]
    pub async fn update_quantity(
        &self,
        ctx: &CallContext,
        product_id: &ProductId,
        quantity: i32,
    ) -> Result<Cart, CartError> {
        if quantity <= 0 {
            return self.remove_item(ctx, product_id).await;
        }
        let quantity = quantity as u32;

        let stock = self.inventory.check_stock(ctx, product_id, quantity).await?;
        if !stock.available {
            return Err(CartError::InsufficientStock {
                message: stock
                    .message
                    .unwrap_or_else(|| OUT_OF_STOCK_MESSAGE.to_string()),
            });
        }

        let mut attempts = 0;
        loop {
            attempts += 1;

            let mut cart = self
                .store
                .find_by_user(ctx.user_id())
                .await?
                .ok_or_else(|| CartError::ItemNotFound {
                    product_id: product_id.to_string(),
                })?;

            match cart.item_mut(product_id) {
                Some(item) => item.quantity = quantity,
                None => {
                    return Err(CartError::ItemNotFound {
                        product_id: product_id.to_string(),
                    });
                }
            }
            cart.touch();

            match self.store.replace(cart).await {
                Ok(cart) => {
                    metrics::counter!("cart_mutations_total", "operation" => "update_quantity")
                        .increment(1);
                    return Ok(cart);
                }
                Err(e) if e.is_retryable() && attempts < MAX_WRITE_ATTEMPTS => {
                    metrics::counter!("cart_replace_conflicts_total").increment(1);
                    tracing::warn!(attempt = attempts, error = %e, "cart write conflict, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Removes a line from the user's cart.
    ///
    /// Fails with [`CartError::ItemNotFound`] when the removal would
    /// not shrink the item count — including when no cart exists.
    #[tracing::instrument(skip(self, ctx), fields(user_id = %ctx.user_id()))]
    pub async fn remove_item(
        &self,
        ctx: &CallContext,
        product_id: &ProductId,
    ) -> Result<Cart, CartError> {
        let mut attempts = 0;
        loop {
            attempts += 1;

            let mut cart = self
                .store
                .find_by_user(ctx.user_id())
                .await?
                .ok_or_else(|| CartError::ItemNotFound {
                    product_id: product_id.to_string(),
                })?;

            if !cart.remove_item(product_id) {
                return Err(CartError::ItemNotFound {
                    product_id: product_id.to_string(),
                });
            }
            cart.touch();

            match self.store.replace(cart).await {
                Ok(cart) => {
                    metrics::counter!("cart_mutations_total", "operation" => "remove_item")
                        .increment(1);
                    return Ok(cart);
                }
                Err(e) if e.is_retryable() && attempts < MAX_WRITE_ATTEMPTS => {
                    metrics::counter!("cart_replace_conflicts_total").increment(1);
                    tracing::warn!(attempt = attempts, error = %e, "cart write conflict, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Loads the user's cart as persisted, without pricing.
    ///
    /// This is the query path consumed by checkout initiation.
    #[tracing::instrument(skip(self, ctx), fields(user_id = %ctx.user_id()))]
    pub async fn get_cart(&self, ctx: &CallContext) -> Result<Option<Cart>, CartError> {
        Ok(self.store.find_by_user(ctx.user_id()).await?)
    }

    /// Loads the user's cart with its price breakdown.
    ///
    /// Returns `Ok(None)` when the user has no cart. The subtotal comes
    /// from the persisted snapshots only; no catalog calls happen here.
    /// A discount or tax failure degrades that contribution to zero —
    /// a downed pricing dependency never blocks cart viewing.
    #[tracing::instrument(skip(self, ctx), fields(user_id = %ctx.user_id()))]
    pub async fn get_cart_details(
        &self,
        ctx: &CallContext,
    ) -> Result<Option<CartDetails>, CartError> {
        let Some(cart) = self.store.find_by_user(ctx.user_id()).await? else {
            return Ok(None);
        };

        let total_discount = match self.discount.calculate_discounts(ctx, &cart.items).await {
            Ok(amount) => amount,
            Err(e) => {
                metrics::counter!("pricing_degraded_total", "service" => "discount").increment(1);
                tracing::warn!(error = %e, "discount engine unavailable, pricing without discount");
                Money::zero()
            }
        };

        let total_tax = match self
            .tax
            .calculate_tax(ctx, &cart.items, &AddressHint::default())
            .await
        {
            Ok(amount) => amount,
            Err(e) => {
                metrics::counter!("pricing_degraded_total", "service" => "tax").increment(1);
                tracing::warn!(error = %e, "tax service unavailable, pricing without tax");
                Money::zero()
            }
        };

        Ok(Some(CartDetails::price(cart, total_discount, total_tax)))
    }

    /// Empties the user's cart, keeping the row.
    ///
    /// Invoked when a downstream event confirms the order. A missing
    /// cart is not an error.
    #[tracing::instrument(skip(self, ctx), fields(user_id = %ctx.user_id()))]
    pub async fn clear_cart(&self, ctx: &CallContext) -> Result<(), CartError> {
        let mut attempts = 0;
        loop {
            attempts += 1;

            let Some(mut cart) = self.store.find_by_user(ctx.user_id()).await? else {
                tracing::warn!("no active cart to clear");
                return Ok(());
            };

            cart.items.clear();
            cart.touch();

            match self.store.replace(cart).await {
                Ok(_) => {
                    metrics::counter!("cart_mutations_total", "operation" => "clear_cart")
                        .increment(1);
                    return Ok(());
                }
                Err(e) if e.is_retryable() && attempts < MAX_WRITE_ATTEMPTS => {
                    metrics::counter!("cart_replace_conflicts_total").increment(1);
                    tracing::warn!(attempt = attempts, error = %e, "cart write conflict, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
