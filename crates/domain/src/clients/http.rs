//! HTTP implementations of the collaborator clients.
//!
//! All adapters share the same construction pattern: a base URL plus a
//! bounded request timeout, with the call context forwarded as
//! `x-user-id` / `x-user-name` / `x-user-roles` headers. A timeout or
//! 5xx surfaces as [`ClientError::Transport`]; the caller decides
//! whether that is fatal (mutations) or absorbed (pricing reads).

use std::time::Duration;

use async_trait::async_trait;
use cart_store::CartItem;
use common::{CallContext, Money, ProductId};
use serde::{Deserialize, Serialize};

use super::catalog::{CatalogClient, Product};
use super::inventory::{InventoryClient, StockAvailability};
use super::pricing::{AddressHint, DiscountClient, TaxClient};
use super::ClientError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Construction parameters shared by all HTTP adapters.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL of the collaborator, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpClientConfig {
    /// Creates a config with the default 5 second timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build(self, service: &'static str) -> Result<(reqwest::Client, String), ClientError> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ClientError::Transport {
                service,
                reason: e.to_string(),
            })?;
        Ok((http, self.base_url))
    }
}

fn with_context(req: reqwest::RequestBuilder, ctx: &CallContext) -> reqwest::RequestBuilder {
    let mut req = req.header("x-user-id", ctx.user_id().as_str());
    if let Some(name) = ctx.user_name() {
        req = req.header("x-user-name", name);
    }
    if !ctx.roles().is_empty() {
        req = req.header("x-user-roles", ctx.roles().join(","));
    }
    req
}

fn transport(service: &'static str, e: reqwest::Error) -> ClientError {
    ClientError::Transport {
        service,
        reason: e.to_string(),
    }
}

fn bad_status(service: &'static str, status: reqwest::StatusCode) -> ClientError {
    ClientError::Transport {
        service,
        reason: format!("unexpected status {status}"),
    }
}

/// Line-item shape sent to the pricing collaborators.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireItem<'a> {
    product_id: &'a str,
    quantity: u32,
    name: &'a str,
    price_cents: i64,
    image_url: &'a str,
}

impl<'a> From<&'a CartItem> for WireItem<'a> {
    fn from(item: &'a CartItem) -> Self {
        Self {
            product_id: item.product_id.as_str(),
            quantity: item.quantity,
            name: &item.name,
            price_cents: item.unit_price.cents(),
            image_url: &item.image_url,
        }
    }
}

// -- Catalog --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogProductDto {
    id: String,
    #[serde(default)]
    name: String,
    /// Decimal price in major units, as served by the catalog.
    price: f64,
    #[serde(default)]
    image_url: String,
}

/// Catalog client backed by the product-read HTTP service.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Creates a catalog client.
    pub fn new(config: HttpClientConfig) -> Result<Self, ClientError> {
        let (http, base_url) = config.build("catalog")?;
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn product(
        &self,
        ctx: &CallContext,
        product_id: &ProductId,
    ) -> Result<Option<Product>, ClientError> {
        let url = format!("{}/products/{}", self.base_url, product_id);
        let response = with_context(self.http.get(&url), ctx)
            .send()
            .await
            .map_err(|e| transport("catalog", e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(bad_status("catalog", response.status()));
        }

        let dto: CatalogProductDto =
            response
                .json()
                .await
                .map_err(|e| ClientError::InvalidResponse {
                    service: "catalog",
                    reason: e.to_string(),
                })?;

        // Decimal-to-cents conversion happens here, once, at the
        // adapter boundary.
        Ok(Some(Product {
            id: ProductId::new(dto.id),
            name: dto.name,
            unit_price: Money::from_major_units(dto.price),
            image_url: dto.image_url,
        }))
    }
}

// -- Inventory --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckStockRequest<'a> {
    product_id: &'a str,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct CheckStockResponse {
    available: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Inventory client backed by the inventory-read HTTP service.
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpInventoryClient {
    /// Creates an inventory client.
    pub fn new(config: HttpClientConfig) -> Result<Self, ClientError> {
        let (http, base_url) = config.build("inventory")?;
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl InventoryClient for HttpInventoryClient {
    async fn check_stock(
        &self,
        ctx: &CallContext,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<StockAvailability, ClientError> {
        let url = format!("{}/check-stock", self.base_url);
        let body = CheckStockRequest {
            product_id: product_id.as_str(),
            quantity,
        };

        let response = with_context(self.http.post(&url), ctx)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport("inventory", e))?;

        if !response.status().is_success() {
            return Err(bad_status("inventory", response.status()));
        }

        let dto: CheckStockResponse =
            response
                .json()
                .await
                .map_err(|e| ClientError::InvalidResponse {
                    service: "inventory",
                    reason: e.to_string(),
                })?;

        Ok(StockAvailability {
            available: dto.available,
            message: dto.message,
        })
    }
}

// -- Discount --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DiscountRequest<'a> {
    items: Vec<WireItem<'a>>,
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct DiscountResponse {
    #[serde(default)]
    total_discount_cents: i64,
}

/// Discount client backed by the discount engine.
#[derive(Debug, Clone)]
pub struct HttpDiscountClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDiscountClient {
    /// Creates a discount client.
    pub fn new(config: HttpClientConfig) -> Result<Self, ClientError> {
        let (http, base_url) = config.build("discount")?;
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl DiscountClient for HttpDiscountClient {
    async fn calculate_discounts(
        &self,
        ctx: &CallContext,
        items: &[CartItem],
    ) -> Result<Money, ClientError> {
        let url = format!("{}/calculate-discounts", self.base_url);
        let body = DiscountRequest {
            items: items.iter().map(WireItem::from).collect(),
            user_id: ctx.user_id().as_str(),
        };

        let response = with_context(self.http.post(&url), ctx)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport("discount", e))?;

        if !response.status().is_success() {
            return Err(bad_status("discount", response.status()));
        }

        let dto: DiscountResponse =
            response
                .json()
                .await
                .map_err(|e| ClientError::InvalidResponse {
                    service: "discount",
                    reason: e.to_string(),
                })?;

        Ok(Money::from_cents(dto.total_discount_cents))
    }
}

// -- Tax --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaxAddress<'a> {
    country: &'a str,
    zip: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaxRequest<'a> {
    items: Vec<WireItem<'a>>,
    user_id: &'a str,
    address: TaxAddress<'a>,
}

#[derive(Debug, Deserialize)]
struct TaxResponse {
    #[serde(default)]
    tax_cents: i64,
}

/// Tax client backed by the tax calculation service.
#[derive(Debug, Clone)]
pub struct HttpTaxClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTaxClient {
    /// Creates a tax client.
    pub fn new(config: HttpClientConfig) -> Result<Self, ClientError> {
        let (http, base_url) = config.build("tax")?;
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl TaxClient for HttpTaxClient {
    async fn calculate_tax(
        &self,
        ctx: &CallContext,
        items: &[CartItem],
        address: &AddressHint,
    ) -> Result<Money, ClientError> {
        let url = format!("{}/calculate-tax", self.base_url);
        let body = TaxRequest {
            items: items.iter().map(WireItem::from).collect(),
            user_id: ctx.user_id().as_str(),
            address: TaxAddress {
                country: &address.country,
                zip: &address.zip,
            },
        };

        let response = with_context(self.http.post(&url), ctx)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport("tax", e))?;

        if !response.status().is_success() {
            return Err(bad_status("tax", response.status()));
        }

        let dto: TaxResponse =
            response
                .json()
                .await
                .map_err(|e| ClientError::InvalidResponse {
                    service: "tax",
                    reason: e.to_string(),
                })?;

        Ok(Money::from_cents(dto.tax_cents))
    }
}
