//! Cart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use cart_store::{Cart, CartStore};
use checkout::CheckoutInitiator;
use chrono::{DateTime, Utc};
use common::{CallContext, ProductId};
use domain::{CartDetails, CartService};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: CartStore> {
    pub cart_service: Arc<CartService<S>>,
    pub checkout: CheckoutInitiator<S>,
}

/// Builds the call context for a request: the user from the path or
/// the `X-User-ID` header, enriched with the gateway's identity headers
/// when present.
pub(crate) fn call_context(user_id: &str, headers: &HeaderMap) -> CallContext {
    let mut ctx = CallContext::new(user_id);
    if let Some(name) = headers.get("x-user-name").and_then(|v| v.to_str().ok()) {
        ctx = ctx.with_user_name(name);
    }
    if let Some(roles) = headers.get("x-user-roles").and_then(|v| v.to_str().ok()) {
        ctx = ctx.with_roles(
            roles
                .split(',')
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect(),
        );
    }
    ctx
}

// -- Request types --

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: i32,
}

#[derive(Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

// -- Response types --

#[derive(Serialize)]
pub struct CartItemResponse {
    pub product_id: String,
    pub quantity: u32,
    pub name: String,
    pub unit_price_cents: i64,
    pub image_url: String,
}

#[derive(Serialize)]
pub struct CartResponse {
    pub id: String,
    pub user_id: String,
    pub items: Vec<CartItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct CartDetailsResponse {
    pub id: String,
    pub user_id: String,
    pub items: Vec<CartItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub subtotal_cents: i64,
    pub total_discount_cents: i64,
    pub total_tax_cents: i64,
    pub total_price_cents: i64,
}

fn item_responses(cart: &Cart) -> Vec<CartItemResponse> {
    cart.items
        .iter()
        .map(|item| CartItemResponse {
            product_id: item.product_id.to_string(),
            quantity: item.quantity,
            name: item.name.clone(),
            unit_price_cents: item.unit_price.cents(),
            image_url: item.image_url.clone(),
        })
        .collect()
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            id: cart.id.to_string(),
            user_id: cart.user_id.to_string(),
            items: item_responses(&cart),
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        }
    }
}

impl From<CartDetails> for CartDetailsResponse {
    fn from(details: CartDetails) -> Self {
        Self {
            id: details.cart.id.to_string(),
            user_id: details.cart.user_id.to_string(),
            items: item_responses(&details.cart),
            created_at: details.cart.created_at,
            updated_at: details.cart.updated_at,
            subtotal_cents: details.subtotal.cents(),
            total_discount_cents: details.total_discount.cents(),
            total_tax_cents: details.total_tax.cents(),
            total_price_cents: details.total_price.cents(),
        }
    }
}

// -- Handlers --

/// GET /cart/{user_id} — the cart with its price breakdown.
#[tracing::instrument(skip(state, headers))]
pub async fn get<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CartDetailsResponse>, ApiError> {
    let ctx = call_context(&user_id, &headers);
    let details = state
        .cart_service
        .get_cart_details(&ctx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Cart not found".to_string()))?;

    Ok(Json(details.into()))
}

/// POST /cart/{user_id}/items — add a product to the cart.
#[tracing::instrument(skip(state, headers, req))]
pub async fn add_item<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartResponse>), ApiError> {
    let ctx = call_context(&user_id, &headers);
    let cart = state
        .cart_service
        .add_item(&ctx, &ProductId::new(req.product_id), req.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(cart.into())))
}

/// PUT /cart/{user_id}/items/{product_id} — set a line's quantity.
#[tracing::instrument(skip(state, headers, req))]
pub async fn update_quantity<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((user_id, product_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let ctx = call_context(&user_id, &headers);
    let cart = state
        .cart_service
        .update_quantity(&ctx, &ProductId::new(product_id), req.quantity)
        .await?;

    Ok(Json(cart.into()))
}

/// DELETE /cart/{user_id}/items/{product_id} — remove a line.
#[tracing::instrument(skip(state, headers))]
pub async fn remove_item<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((user_id, product_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<CartResponse>, ApiError> {
    let ctx = call_context(&user_id, &headers);
    let cart = state
        .cart_service
        .remove_item(&ctx, &ProductId::new(product_id))
        .await?;

    Ok(Json(cart.into()))
}

/// DELETE /cart/{user_id} — empty the cart, keeping the row.
#[tracing::instrument(skip(state, headers))]
pub async fn clear<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let ctx = call_context(&user_id, &headers);
    state.cart_service.clear_cart(&ctx).await?;

    Ok(StatusCode::NO_CONTENT)
}
