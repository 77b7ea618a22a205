//! Discount and tax client traits with in-memory implementations.
//!
//! Both collaborators are optional on the read path: a failure here is
//! absorbed by the caller, never propagated to the cart viewer.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use cart_store::CartItem;
use common::{CallContext, Money};

use super::ClientError;

/// Coarse address used for tax calculation until real address capture
/// exists upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressHint {
    /// ISO country code.
    pub country: String,
    /// Postal code.
    pub zip: String,
}

impl Default for AddressHint {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            zip: "90210".to_string(),
        }
    }
}

/// Trait for the discount engine.
#[async_trait]
pub trait DiscountClient: Send + Sync {
    /// Returns the total discount for the given priced line items.
    async fn calculate_discounts(
        &self,
        ctx: &CallContext,
        items: &[CartItem],
    ) -> Result<Money, ClientError>;
}

/// Trait for the tax calculation service.
#[async_trait]
pub trait TaxClient: Send + Sync {
    /// Returns the total tax for the given priced line items.
    async fn calculate_tax(
        &self,
        ctx: &CallContext,
        items: &[CartItem],
        address: &AddressHint,
    ) -> Result<Money, ClientError>;
}

#[derive(Debug)]
struct FixedAmountState {
    amount: Money,
    fail: bool,
}

/// In-memory discount client returning a fixed amount.
#[derive(Debug, Clone)]
pub struct InMemoryDiscountClient {
    state: Arc<RwLock<FixedAmountState>>,
}

impl InMemoryDiscountClient {
    /// Creates a client that grants no discount.
    pub fn new() -> Self {
        Self::with_discount(Money::zero())
    }

    /// Creates a client that grants a fixed discount.
    pub fn with_discount(amount: Money) -> Self {
        Self {
            state: Arc::new(RwLock::new(FixedAmountState {
                amount,
                fail: false,
            })),
        }
    }

    /// Changes the granted discount.
    pub fn set_discount(&self, amount: Money) {
        self.state.write().unwrap().amount = amount;
    }

    /// Configures the client to fail on the next call.
    pub fn set_fail(&self, fail: bool) {
        self.state.write().unwrap().fail = fail;
    }
}

impl Default for InMemoryDiscountClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiscountClient for InMemoryDiscountClient {
    async fn calculate_discounts(
        &self,
        _ctx: &CallContext,
        _items: &[CartItem],
    ) -> Result<Money, ClientError> {
        let state = self.state.read().unwrap();

        if state.fail {
            return Err(ClientError::Transport {
                service: "discount",
                reason: "connection refused".to_string(),
            });
        }

        Ok(state.amount)
    }
}

/// In-memory tax client returning a fixed amount.
#[derive(Debug, Clone)]
pub struct InMemoryTaxClient {
    state: Arc<RwLock<FixedAmountState>>,
}

impl InMemoryTaxClient {
    /// Creates a client that charges no tax.
    pub fn new() -> Self {
        Self::with_tax(Money::zero())
    }

    /// Creates a client that charges a fixed tax.
    pub fn with_tax(amount: Money) -> Self {
        Self {
            state: Arc::new(RwLock::new(FixedAmountState {
                amount,
                fail: false,
            })),
        }
    }

    /// Changes the charged tax.
    pub fn set_tax(&self, amount: Money) {
        self.state.write().unwrap().amount = amount;
    }

    /// Configures the client to fail on the next call.
    pub fn set_fail(&self, fail: bool) {
        self.state.write().unwrap().fail = fail;
    }
}

impl Default for InMemoryTaxClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaxClient for InMemoryTaxClient {
    async fn calculate_tax(
        &self,
        _ctx: &CallContext,
        _items: &[CartItem],
        _address: &AddressHint,
    ) -> Result<Money, ClientError> {
        let state = self.state.read().unwrap();

        if state.fail {
            return Err(ClientError::Transport {
                service: "tax",
                reason: "connection refused".to_string(),
            });
        }

        Ok(state.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_discount() {
        let discount = InMemoryDiscountClient::with_discount(Money::from_cents(100));
        let ctx = CallContext::new("user-1");

        let amount = discount.calculate_discounts(&ctx, &[]).await.unwrap();
        assert_eq!(amount.cents(), 100);
    }

    #[tokio::test]
    async fn test_fixed_tax() {
        let tax = InMemoryTaxClient::with_tax(Money::from_cents(50));
        let ctx = CallContext::new("user-1");

        let amount = tax
            .calculate_tax(&ctx, &[], &AddressHint::default())
            .await
            .unwrap();
        assert_eq!(amount.cents(), 50);
    }

    #[tokio::test]
    async fn test_fail_flags() {
        let discount = InMemoryDiscountClient::new();
        let tax = InMemoryTaxClient::new();
        discount.set_fail(true);
        tax.set_fail(true);

        let ctx = CallContext::new("user-1");
        assert!(discount.calculate_discounts(&ctx, &[]).await.is_err());
        assert!(
            tax.calculate_tax(&ctx, &[], &AddressHint::default())
                .await
                .is_err()
        );
    }

    #[test]
    fn test_default_address_hint() {
        let hint = AddressHint::default();
        assert_eq!(hint.country, "US");
        assert_eq!(hint.zip, "90210");
    }
}
