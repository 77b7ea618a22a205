//! Checkout-saga initiation.
//!
//! This crate owns the boundary where the cart hands off to the
//! distributed order saga: it reads the user's cart through the cart
//! service's query path, builds the saga-initiating event payload, and
//! publishes it to the checkout topic. The cart itself is not locked,
//! cleared, or otherwise mutated by initiation; clearing happens later,
//! when a downstream event confirms the order.

pub mod error;
pub mod event;
pub mod initiator;
pub mod publisher;

#[cfg(feature = "kafka")]
pub mod kafka;

pub use error::CheckoutError;
pub use event::{
    CHECKOUT_EVENTS_TOPIC, CHECKOUT_INITIATED_EVENT_TYPE, CheckoutInitiatedEvent, CheckoutLineItem,
};
pub use initiator::{CheckoutInitiator, CheckoutReceipt};
pub use publisher::{EventPublisher, InMemoryEventPublisher, PublishError, PublishedMessage};

#[cfg(feature = "kafka")]
pub use kafka::KafkaEventPublisher;
