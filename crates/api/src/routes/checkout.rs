//! Checkout initiation endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use cart_store::CartStore;
use serde::Serialize;

use crate::error::ApiError;
use crate::routes::cart::{AppState, call_context};

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub saga_id: String,
    pub message: &'static str,
}

/// POST /checkout/initiate — start the order saga from the current cart.
///
/// The authenticated user arrives as the `X-User-ID` header, resolved
/// by the gateway's auth middleware upstream.
#[tracing::instrument(skip(state, headers))]
pub async fn initiate<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized: User ID missing".to_string()))?;

    let ctx = call_context(user_id, &headers);
    let receipt = state.checkout.initiate(&ctx).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(CheckoutResponse {
            saga_id: receipt.saga_id.to_string(),
            message: "Checkout initiated",
        }),
    ))
}
