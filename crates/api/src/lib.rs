//! HTTP API server with observability for the cart platform.
//!
//! Exposes the cart and checkout operations over REST, with structured
//! logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use cart_store::CartStore;
use checkout::{CheckoutInitiator, InMemoryEventPublisher};
use domain::{
    CartService, InMemoryCatalogClient, InMemoryDiscountClient, InMemoryInventoryClient,
    InMemoryTaxClient,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::cart::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: CartStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/cart/{user_id}", get(routes::cart::get::<S>))
        .route("/cart/{user_id}", delete(routes::cart::clear::<S>))
        .route("/cart/{user_id}/items", post(routes::cart::add_item::<S>))
        .route(
            "/cart/{user_id}/items/{product_id}",
            put(routes::cart::update_quantity::<S>),
        )
        .route(
            "/cart/{user_id}/items/{product_id}",
            delete(routes::cart::remove_item::<S>),
        )
        .route(
            "/checkout/initiate",
            post(routes::checkout::initiate::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Handles to the in-memory collaborators behind a default state, so
/// tests can seed products, stock, pricing, and failures.
#[derive(Clone)]
pub struct InMemoryCollaborators {
    pub catalog: InMemoryCatalogClient,
    pub inventory: InMemoryInventoryClient,
    pub discount: InMemoryDiscountClient,
    pub tax: InMemoryTaxClient,
    pub publisher: InMemoryEventPublisher,
}

/// Creates application state wired to in-memory collaborators.
pub fn create_default_state<S: CartStore + 'static>(
    store: S,
) -> (Arc<AppState<S>>, InMemoryCollaborators) {
    let collaborators = InMemoryCollaborators {
        catalog: InMemoryCatalogClient::new(),
        inventory: InMemoryInventoryClient::new(),
        discount: InMemoryDiscountClient::new(),
        tax: InMemoryTaxClient::new(),
        publisher: InMemoryEventPublisher::new(),
    };

    let cart_service = Arc::new(CartService::new(
        store,
        Arc::new(collaborators.catalog.clone()),
        Arc::new(collaborators.inventory.clone()),
        Arc::new(collaborators.discount.clone()),
        Arc::new(collaborators.tax.clone()),
    ));

    let checkout = CheckoutInitiator::new(
        cart_service.clone(),
        Arc::new(collaborators.publisher.clone()),
    );

    let state = Arc::new(AppState {
        cart_service,
        checkout,
    });

    (state, collaborators)
}
