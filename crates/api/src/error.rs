//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cart_store::StoreError;
use checkout::CheckoutError;
use domain::CartError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Missing or unusable identity.
    Unauthorized(String),
    /// Cart operation error.
    Cart(CartError),
    /// Checkout initiation error.
    Checkout(CheckoutError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Cart(err) => cart_error_to_response(err),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn cart_error_to_response(err: CartError) -> (StatusCode, String) {
    match &err {
        CartError::InvalidQuantity { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        CartError::ProductNotFound { .. } | CartError::ItemNotFound { .. } => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        // Distinct from generic failure so the storefront can react
        // (e.g. prompt the user to lower the quantity).
        CartError::InsufficientStock { .. } => (StatusCode::CONFLICT, err.to_string()),
        CartError::Store(StoreError::ConcurrencyConflict { .. }) => {
            (StatusCode::CONFLICT, err.to_string())
        }
        CartError::Collaborator(_) | CartError::Store(_) => {
            tracing::error!(error = %err, "cart operation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    match err {
        CheckoutError::EmptyCart => (StatusCode::BAD_REQUEST, err.to_string()),
        CheckoutError::Cart(cart_err) => cart_error_to_response(cart_err),
        CheckoutError::Publish(_) | CheckoutError::Serialization(_) => {
            tracing::error!(error = %err, "checkout initiation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to initiate checkout".to_string(),
            )
        }
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::Cart(err)
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}
