//! The saga-initiating event payload.

use cart_store::Cart;
use common::SagaId;
use serde::{Deserialize, Serialize};

/// Topic every checkout event is published to.
pub const CHECKOUT_EVENTS_TOPIC: &str = "checkout.checkout-events";

/// Value of the `eventType` header attached to each published message.
pub const CHECKOUT_INITIATED_EVENT_TYPE: &str = "CheckoutInitiatedEvent";

/// One cart line as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLineItem {
    pub product_id: String,
    pub quantity: u32,
    pub price_cents: i64,
    pub name: String,
    pub image_url: String,
}

/// Event starting the downstream order saga.
///
/// Immutable once built; `saga_id` is the correlation key for every
/// downstream saga step, and consumers deduplicate replays on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutInitiatedEvent {
    pub saga_id: SagaId,
    pub user_id: String,
    pub cart_id: String,
    pub items: Vec<CheckoutLineItem>,
    pub total_price_cents: i64,
    pub total_discount_cents: i64,
    pub total_tax_cents: i64,
}

impl CheckoutInitiatedEvent {
    /// Builds the payload from a cart snapshot.
    ///
    /// Totals are recomputed from the raw line items with discount and
    /// tax at zero: the cart wire model does not carry its priced
    /// breakdown, so the saga consumer recalculates the final amounts
    /// downstream. The snapshot prices are authoritative here — no
    /// live catalog or pricing lookups on this path.
    pub fn from_cart(saga_id: SagaId, cart: &Cart) -> Self {
        let items: Vec<CheckoutLineItem> = cart
            .items
            .iter()
            .map(|item| CheckoutLineItem {
                product_id: item.product_id.to_string(),
                quantity: item.quantity,
                price_cents: item.unit_price.cents(),
                name: item.name.clone(),
                image_url: item.image_url.clone(),
            })
            .collect();

        let subtotal_cents: i64 = items
            .iter()
            .map(|i| i.price_cents * i.quantity as i64)
            .sum();
        let total_discount_cents = 0;
        let total_tax_cents = 0;

        Self {
            saga_id,
            user_id: cart.user_id.to_string(),
            cart_id: cart.id.to_string(),
            items,
            total_price_cents: subtotal_cents - total_discount_cents + total_tax_cents,
            total_discount_cents,
            total_tax_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_store::CartItem;
    use common::Money;

    fn two_item_cart() -> Cart {
        let mut cart = Cart::new("user-1");
        cart.merge_item(CartItem::new(
            "SKU-001",
            2,
            "Widget",
            Money::from_cents(1000),
            "https://img.example/w.png",
        ));
        cart.merge_item(CartItem::new(
            "SKU-002",
            1,
            "Gadget",
            Money::from_cents(500),
            "https://img.example/g.png",
        ));
        cart
    }

    #[test]
    fn test_payload_mirrors_cart_snapshot() {
        let cart = two_item_cart();
        let saga_id = SagaId::new();
        let event = CheckoutInitiatedEvent::from_cart(saga_id, &cart);

        assert_eq!(event.saga_id, saga_id);
        assert_eq!(event.user_id, "user-1");
        assert_eq!(event.cart_id, cart.id.to_string());
        assert_eq!(event.items.len(), 2);
        assert_eq!(event.items[0].product_id, "SKU-001");
        assert_eq!(event.items[0].price_cents, 1000);
        assert_eq!(event.items[0].image_url, "https://img.example/w.png");
    }

    #[test]
    fn test_totals_are_raw_subtotal_with_zero_discount_and_tax() {
        let event = CheckoutInitiatedEvent::from_cart(SagaId::new(), &two_item_cart());

        assert_eq!(event.total_price_cents, 2500);
        assert_eq!(event.total_discount_cents, 0);
        assert_eq!(event.total_tax_cents, 0);
    }

    #[test]
    fn test_wire_format_uses_snake_case_fields() {
        let event = CheckoutInitiatedEvent::from_cart(SagaId::new(), &two_item_cart());
        let json = serde_json::to_value(&event).unwrap();

        assert!(json.get("saga_id").is_some());
        assert!(json.get("total_price_cents").is_some());
        assert!(json["items"][0].get("product_id").is_some());
        assert!(json["items"][0].get("image_url").is_some());
    }
}
