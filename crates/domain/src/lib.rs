//! Domain layer for the cart platform.
//!
//! This crate provides the core cart operations:
//! - CartService enforcing the cart invariants against remote collaborators
//! - Client traits for the catalog, inventory, discount, and tax services
//! - CartDetails, the priced read-time projection of a cart

pub mod clients;
pub mod details;
pub mod error;
pub mod service;

pub use clients::{
    AddressHint, CatalogClient, ClientError, DiscountClient, HttpCatalogClient, HttpClientConfig,
    HttpDiscountClient, HttpInventoryClient, HttpTaxClient, InMemoryCatalogClient,
    InMemoryDiscountClient, InMemoryInventoryClient, InMemoryTaxClient, InventoryClient, Product,
    StockAvailability, TaxClient,
};
pub use details::CartDetails;
pub use error::CartError;
pub use service::CartService;
