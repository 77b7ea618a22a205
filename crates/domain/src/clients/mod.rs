//! Remote collaborator client traits and implementations.
//!
//! Each collaborator is a trait with an in-memory implementation for
//! tests and an HTTP implementation for deployment. Every call takes
//! the request's [`common::CallContext`] explicitly; the HTTP adapters
//! forward it as `x-user-*` headers.

pub mod catalog;
pub mod http;
pub mod inventory;
pub mod pricing;

pub use catalog::{CatalogClient, InMemoryCatalogClient, Product};
pub use http::{
    HttpCatalogClient, HttpClientConfig, HttpDiscountClient, HttpInventoryClient, HttpTaxClient,
};
pub use inventory::{InMemoryInventoryClient, InventoryClient, StockAvailability};
pub use pricing::{
    AddressHint, DiscountClient, InMemoryDiscountClient, InMemoryTaxClient, TaxClient,
};

use thiserror::Error;

/// Errors surfaced by remote collaborator clients.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The collaborator could not be reached or answered with a
    /// server-side failure.
    #[error("{service} request failed: {reason}")]
    Transport {
        service: &'static str,
        reason: String,
    },

    /// The collaborator answered, but the response could not be
    /// interpreted.
    #[error("{service} returned an invalid response: {reason}")]
    InvalidResponse {
        service: &'static str,
        reason: String,
    },
}
