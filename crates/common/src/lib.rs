//! Shared types for the cart platform.
//!
//! This crate provides the identifier newtypes, the `Money` value type,
//! and the per-call `CallContext` threaded into every collaborator call.

pub mod context;
pub mod money;
pub mod types;

pub use context::CallContext;
pub use money::Money;
pub use types::{CartId, ProductId, SagaId, UserId};
