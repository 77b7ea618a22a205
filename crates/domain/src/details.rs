//! Priced read-time projection of a cart.

use cart_store::Cart;
use common::Money;

/// A cart together with its price breakdown, computed fresh on every
/// read. Never persisted and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartDetails {
    /// The cart as persisted.
    pub cart: Cart,
    /// Sum of all line totals from the stored snapshots.
    pub subtotal: Money,
    /// Discount contribution; zero when the discount engine degraded.
    pub total_discount: Money,
    /// Tax contribution; zero when the tax service degraded.
    pub total_tax: Money,
    /// `subtotal − total_discount + total_tax`.
    pub total_price: Money,
}

impl CartDetails {
    /// Prices a cart with the given discount and tax contributions.
    pub fn price(cart: Cart, total_discount: Money, total_tax: Money) -> Self {
        let subtotal = cart.subtotal();
        let total_price = subtotal - total_discount + total_tax;
        Self {
            cart,
            subtotal,
            total_discount,
            total_tax,
            total_price,
        }
    }
}
