//! PayPal Orders v2 client.
//!
//! Only the calls the checkout flow needs: create an order, capture it, and
//! read it back. An OAuth access token is requested for every call, the
//! service keeps nothing between requests.
//!
//! Every order line carries the product id as its `sku`, so a captured order
//! says which products were paid for.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::PayPalConfig;

/// Order status as reported by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Saved,
    Approved,
    Voided,
    Completed,
    PayerActionRequired,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUnitItem {
    #[serde(default)]
    pub sku: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUnit {
    #[serde(default)]
    pub items: Vec<OrderUnitItem>,
}

/// The part of a processor order the storefront cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub purchase_units: Vec<OrderUnit>,
}

impl PaymentOrder {
    /// Distinct product ids across all order lines, sorted.
    pub fn product_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .purchase_units
            .iter()
            .flat_map(|u| u.items.iter())
            .filter_map(|i| i.sku.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

/// One priced line, resolved against the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    /// Decimal unit price, two places.
    pub unit_amount: String,
}

/// What to charge and where to send the buyer afterwards.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Decimal amount, two places. Equals the sum of the lines.
    pub amount: String,
    pub currency: String,
    pub description: String,
    pub return_url: String,
    pub cancel_url: String,
    pub lines: Vec<OrderLine>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, order: &NewOrder) -> Result<PaymentOrder>;
    /// Captures the order. An order captured earlier is reported as it stands.
    async fn capture_order(&self, order_id: &str) -> Result<PaymentOrder>;
    async fn get_order(&self, order_id: &str) -> Result<PaymentOrder>;
}

#[derive(Debug, Serialize)]
struct Money<'a> {
    currency_code: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct Breakdown<'a> {
    item_total: Money<'a>,
}

#[derive(Debug, Serialize)]
struct Amount<'a> {
    currency_code: &'a str,
    value: &'a str,
    breakdown: Breakdown<'a>,
}

#[derive(Debug, Serialize)]
struct Item<'a> {
    name: &'a str,
    sku: &'a str,
    quantity: String,
    unit_amount: Money<'a>,
    category: &'static str,
}

#[derive(Debug, Serialize)]
struct PurchaseUnit<'a> {
    amount: Amount<'a>,
    description: &'a str,
    items: Vec<Item<'a>>,
}

#[derive(Debug, Serialize)]
struct ApplicationContext<'a> {
    brand_name: &'a str,
    landing_page: &'static str,
    user_action: &'static str,
    return_url: &'a str,
    cancel_url: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    intent: &'static str,
    purchase_units: Vec<PurchaseUnit<'a>>,
    application_context: ApplicationContext<'a>,
}

impl<'a> CreateOrderBody<'a> {
    fn new(order: &'a NewOrder, brand_name: &'a str) -> Self {
        let currency = order.currency.as_str();
        let items = order
            .lines
            .iter()
            .map(|line| Item {
                name: &line.name,
                sku: &line.product_id,
                quantity: line.quantity.to_string(),
                unit_amount: Money {
                    currency_code: currency,
                    value: &line.unit_amount,
                },
                category: "DIGITAL_GOODS",
            })
            .collect();

        Self {
            intent: "CAPTURE",
            purchase_units: vec![PurchaseUnit {
                amount: Amount {
                    currency_code: currency,
                    value: &order.amount,
                    breakdown: Breakdown {
                        item_total: Money {
                            currency_code: currency,
                            value: &order.amount,
                        },
                    },
                },
                description: &order.description,
                items,
            }],
            application_context: ApplicationContext {
                brand_name,
                landing_page: "NO_PREFERENCE",
                user_action: "PAY_NOW",
                return_url: &order.return_url,
                cancel_url: &order.cancel_url,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    issue: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

/// True for the 422 body PayPal sends when an order was captured before.
fn is_already_captured(body: &str) -> bool {
    serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.details.iter().any(|d| d.issue == "ORDER_ALREADY_CAPTURED"))
        .unwrap_or(false)
}

pub struct PayPalClient {
    client: reqwest::Client,
    api_base: String,
    client_id: String,
    client_secret: String,
    brand_name: String,
}

impl PayPalClient {
    pub fn new(cfg: &PayPalConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
            brand_name: cfg.brand_name.clone(),
        }
    }

    async fn access_token(&self) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/v1/oauth2/token", self.api_base))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .context("Failed to request PayPal access token")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("PayPal auth error: {} - {}", status, body);
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse PayPal token response")?;
        Ok(token.access_token)
    }

    /// Sends an authenticated request asking for the full order in the reply.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let token = self.access_token().await?;
        request
            .bearer_auth(token)
            .header("Prefer", "return=representation")
            .send()
            .await
            .context("Failed to make PayPal API request")
    }

    async fn decode(response: reqwest::Response) -> Result<PaymentOrder> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("PayPal API error: {} - {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse PayPal API response")
    }
}

#[async_trait]
impl PaymentGateway for PayPalClient {
    #[instrument(skip(self, order), fields(amount = %order.amount))]
    async fn create_order(&self, order: &NewOrder) -> Result<PaymentOrder> {
        let body = CreateOrderBody::new(order, &self.brand_name);
        let response = self
            .send(
                self.client
                    .post(format!("{}/v2/checkout/orders", self.api_base))
                    .json(&body),
            )
            .await?;
        let created = Self::decode(response).await?;
        debug!(order_id = %created.id, status = ?created.status, "paypal order created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn capture_order(&self, order_id: &str) -> Result<PaymentOrder> {
        let response = self
            .send(
                self.client
                    .post(format!(
                        "{}/v2/checkout/orders/{}/capture",
                        self.api_base, order_id
                    ))
                    .json(&serde_json::json!({})),
            )
            .await?;

        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            let body = response.text().await.unwrap_or_default();
            if is_already_captured(&body) {
                warn!("paypal order already captured, reading it back");
                return self.get_order(order_id).await;
            }
            anyhow::bail!("PayPal API error: {} - {}", StatusCode::UNPROCESSABLE_ENTITY, body);
        }

        let captured = Self::decode(response).await?;
        debug!(status = ?captured.status, "paypal order captured");
        Ok(captured)
    }

    #[instrument(skip(self))]
    async fn get_order(&self, order_id: &str) -> Result<PaymentOrder> {
        let response = self
            .send(
                self.client
                    .get(format!("{}/v2/checkout/orders/{}", self.api_base, order_id)),
            )
            .await?;
        Self::decode(response).await
    }
}
