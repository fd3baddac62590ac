use serde::{Deserialize, Serialize};

use crate::payments::{OrderStatus, PaymentOrder};

fn one() -> i64 {
    1
}

/// One cart line. The price comes from the catalogue, so any client-side
/// `price` or `title` is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    #[serde(default, alias = "productId", alias = "product_id")]
    pub id: String,
    #[serde(default = "one")]
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<LineItem>,
}

#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    #[serde(default, rename = "orderID", alias = "orderId", alias = "order_id")]
    pub order_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub status: OrderStatus,
}

impl From<PaymentOrder> for OrderResponse {
    fn from(o: PaymentOrder) -> Self {
        Self {
            id: o.id,
            status: o.status,
        }
    }
}

/// Public checkout settings for the PayPal JS SDK.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalPublicConfig {
    pub client_id: String,
    pub currency: String,
}
