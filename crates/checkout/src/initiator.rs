//! Checkout initiation: cart read, payload construction, publish.

use std::sync::Arc;

use cart_store::CartStore;
use common::{CallContext, SagaId};
use domain::CartService;
use uuid::Uuid;

use crate::error::CheckoutError;
use crate::event::{CHECKOUT_EVENTS_TOPIC, CHECKOUT_INITIATED_EVENT_TYPE, CheckoutInitiatedEvent};
use crate::publisher::EventPublisher;

/// Correlation handle returned to the caller once the saga has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutReceipt {
    /// Correlation key of the initiated saga.
    pub saga_id: SagaId,
}

/// Starts the order saga from the current state of a user's cart.
///
/// Initiation reads the cart through the cart service's query path and
/// publishes exactly one [`CheckoutInitiatedEvent`] per successful
/// attempt. The cart is left untouched; there is no checked-out state.
pub struct CheckoutInitiator<S: CartStore> {
    carts: Arc<CartService<S>>,
    publisher: Arc<dyn EventPublisher>,
}

impl<S: CartStore> CheckoutInitiator<S> {
    /// Creates a new checkout initiator.
    pub fn new(carts: Arc<CartService<S>>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { carts, publisher }
    }

    /// Initiates a checkout for the authenticated user.
    ///
    /// Fails with [`CheckoutError::EmptyCart`] when the cart is missing
    /// or has no items, and with [`CheckoutError::Publish`] when the
    /// broker rejects the event — in both cases nothing was handed to
    /// the saga and the caller may retry the whole flow, which will
    /// mint a new saga ID.
    #[tracing::instrument(skip(self, ctx), fields(user_id = %ctx.user_id()))]
    pub async fn initiate(&self, ctx: &CallContext) -> Result<CheckoutReceipt, CheckoutError> {
        let saga_id = SagaId::new();

        let cart = self
            .carts
            .get_cart(ctx)
            .await?
            .ok_or(CheckoutError::EmptyCart)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let event = CheckoutInitiatedEvent::from_cart(saga_id, &cart);
        let payload = serde_json::to_vec(&event)?;

        // Partitioning key only; saga correlation travels in the payload.
        let key = Uuid::new_v4().to_string();

        match self
            .publisher
            .publish(
                CHECKOUT_EVENTS_TOPIC,
                &key,
                &payload,
                &[("eventType", CHECKOUT_INITIATED_EVENT_TYPE)],
            )
            .await
        {
            Ok(()) => {
                metrics::counter!("checkout_initiated_total").increment(1);
                tracing::info!(saga_id = %saga_id, items = event.items.len(), "checkout initiated");
                Ok(CheckoutReceipt { saga_id })
            }
            Err(e) => {
                metrics::counter!("checkout_publish_failures_total").increment(1);
                tracing::error!(saga_id = %saga_id, error = %e, "checkout initiation failed");
                Err(e.into())
            }
        }
    }
}
