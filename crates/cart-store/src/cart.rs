//! The cart aggregate and its line items.

use chrono::{DateTime, Utc};
use common::{CartId, Money, ProductId, UserId};
use serde::{Deserialize, Serialize};

/// Optimistic concurrency token for a cart row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Version(i64);

impl Version {
    /// Creates a version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the version assigned to a freshly created cart row.
    pub fn initial() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// One line in a cart.
///
/// Name, price, and image are a denormalized snapshot of the catalog
/// taken when the item was added. They are not re-synced when the
/// catalog changes; re-adding the product captures a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product identifier.
    pub product_id: ProductId,

    /// Quantity in the cart. Always strictly positive; a zero or
    /// negative request removes the line instead.
    pub quantity: u32,

    /// Product name snapshot.
    pub name: String,

    /// Unit price snapshot in cents.
    pub unit_price: Money,

    /// Product image URL snapshot.
    pub image_url: String,
}

impl CartItem {
    /// Creates a new cart item.
    pub fn new(
        product_id: impl Into<ProductId>,
        quantity: u32,
        name: impl Into<String>,
        unit_price: Money,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            name: name.into(),
            unit_price,
            image_url: image_url.into(),
        }
    }

    /// Returns the total price for this line (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// A user's shopping cart.
///
/// Exactly one cart exists per user at a time, created lazily on the
/// first mutation. Items keep stable insertion order. The cart is
/// mutated as a whole unit and persisted through [`crate::CartStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Surrogate identifier of this cart.
    pub id: CartId,

    /// Owning user; immutable after creation.
    pub user_id: UserId,

    /// Line items in insertion order.
    pub items: Vec<CartItem>,

    /// Optimistic concurrency token, bumped on every replace.
    #[serde(default)]
    pub version: Version,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last-mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Creates an empty cart for a user.
    pub fn new(user_id: impl Into<UserId>) -> Self {
        let now = Utc::now();
        Self {
            id: CartId::new(),
            user_id: user_id.into(),
            items: Vec::new(),
            version: Version::initial(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the item for a product, if present.
    pub fn item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// Returns a mutable reference to the item for a product.
    pub fn item_mut(&mut self, product_id: &ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| &i.product_id == product_id)
    }

    /// Merges an item into the cart.
    ///
    /// If a line with the same product already exists, only its quantity
    /// grows; the existing snapshot (name, price, image) wins. Otherwise
    /// the item is appended, preserving insertion order.
    pub fn merge_item(&mut self, item: CartItem) {
        match self.item_mut(&item.product_id) {
            Some(existing) => existing.quantity += item.quantity,
            None => self.items.push(item),
        }
    }

    /// Removes the line for a product.
    ///
    /// Returns true if the item count shrank.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        self.items.len() < before
    }

    /// Returns the number of lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line totals, from the stored snapshots.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Bumps the last-mutation timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(quantity: u32) -> CartItem {
        CartItem::new(
            "SKU-001",
            quantity,
            "Widget",
            Money::from_cents(1000),
            "https://img.example/widget.png",
        )
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new("user-1");
        assert!(cart.is_empty());
        assert_eq!(cart.version, Version::initial());
        assert_eq!(cart.created_at, cart.updated_at);
    }

    #[test]
    fn test_merge_new_item_appends() {
        let mut cart = Cart::new("user-1");
        cart.merge_item(widget(2));

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.item(&ProductId::new("SKU-001")).unwrap().quantity, 2);
    }

    #[test]
    fn test_merge_existing_item_adds_quantity_and_keeps_snapshot() {
        let mut cart = Cart::new("user-1");
        cart.merge_item(widget(2));

        // Same product, different snapshot price: the stored one wins.
        cart.merge_item(CartItem::new(
            "SKU-001",
            3,
            "Widget v2",
            Money::from_cents(9999),
            "https://img.example/widget-v2.png",
        ));

        assert_eq!(cart.item_count(), 1);
        let item = cart.item(&ProductId::new("SKU-001")).unwrap();
        assert_eq!(item.quantity, 5);
        assert_eq!(item.name, "Widget");
        assert_eq!(item.unit_price.cents(), 1000);
    }

    #[test]
    fn test_merge_preserves_insertion_order() {
        let mut cart = Cart::new("user-1");
        cart.merge_item(widget(1));
        cart.merge_item(CartItem::new(
            "SKU-002",
            1,
            "Gadget",
            Money::from_cents(500),
            "",
        ));
        cart.merge_item(widget(1));

        let ids: Vec<&str> = cart.items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, ["SKU-001", "SKU-002"]);
    }

    #[test]
    fn test_remove_item_shrinks() {
        let mut cart = Cart::new("user-1");
        cart.merge_item(widget(2));

        assert!(cart.remove_item(&ProductId::new("SKU-001")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_item_reports_no_shrink() {
        let mut cart = Cart::new("user-1");
        cart.merge_item(widget(2));

        assert!(!cart.remove_item(&ProductId::new("SKU-999")));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_subtotal_sums_line_totals() {
        let mut cart = Cart::new("user-1");
        cart.merge_item(widget(2));
        cart.merge_item(CartItem::new(
            "SKU-002",
            3,
            "Gadget",
            Money::from_cents(500),
            "",
        ));

        assert_eq!(cart.subtotal().cents(), 2 * 1000 + 3 * 500);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(widget(3).line_total().cents(), 3000);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut cart = Cart::new("user-1");
        cart.merge_item(widget(2));

        let json = serde_json::to_string(&cart).unwrap();
        let deserialized: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(cart, deserialized);
    }
}
