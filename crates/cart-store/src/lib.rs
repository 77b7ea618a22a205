//! Cart aggregate persistence.
//!
//! One cart row per user, with the line items stored as a single
//! structured blob. The cart is the unit of optimistic mutation:
//! `replace` is a compare-and-swap on the cart's version token, so two
//! concurrent read-modify-write cycles on the same user cannot silently
//! overwrite each other.

pub mod cart;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cart::{Cart, CartItem, Version};
pub use error::{Result, StoreError};
pub use memory::InMemoryCartStore;
pub use postgres::PostgresCartStore;
pub use store::CartStore;
