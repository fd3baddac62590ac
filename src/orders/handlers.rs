use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    orders::{
        dto::{CaptureRequest, CreateOrderRequest, OrderResponse, PayPalPublicConfig},
        services::{check_cart, format_amount, is_valid_order_id, order_lines, order_total_cents},
    },
    payments::{NewOrder, OrderStatus},
    products::services::is_valid_product_id,
    state::AppState,
};

const ORDER_DESCRIPTION: &str = "Game development assets";

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/paypal-config", get(paypal_config))
        .route("/create-order", post(create_order))
        .route("/create-paypal-order", post(create_order))
        .route("/capture-payment", post(capture_payment))
        .route("/capture-paypal-payment", post(capture_payment))
        .route("/verify-payment/:order_id", get(verify_payment))
}

pub async fn paypal_config(State(state): State<AppState>) -> Json<PayPalPublicConfig> {
    Json(PayPalPublicConfig {
        client_id: state.config.paypal.client_id.clone(),
        currency: state.config.paypal.currency.clone(),
    })
}

#[instrument(skip(state, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> ApiResult<Json<OrderResponse>> {
    let Json(payload) = payload?;
    check_cart(&payload.items)?;

    let mut priced = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        let Some(product) = state.products.get(&item.id).await? else {
            warn!(product_id = %item.id, "order for unknown product");
            return Err(ApiError::bad_request("Unknown product"));
        };
        priced.push((product, item.quantity));
    }
    let total = order_total_cents(&priced)?;

    let order = NewOrder {
        amount: format_amount(total),
        currency: state.config.paypal.currency.clone(),
        description: ORDER_DESCRIPTION.to_string(),
        return_url: format!("{}/success", state.config.client_url),
        cancel_url: format!("{}/cancel", state.config.client_url),
        lines: order_lines(&priced),
    };

    let created = state.payments.create_order(&order).await?;
    info!(order_id = %created.id, amount = %order.amount, items = order.lines.len(), "order created");
    Ok(Json(created.into()))
}

/// Captures the order and records one purchase per product it paid for.
#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn capture_payment(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CaptureRequest>, JsonRejection>,
) -> ApiResult<Json<OrderResponse>> {
    let Json(payload) = payload?;

    let order_id = payload.order_id.unwrap_or_default();
    if !is_valid_order_id(&order_id) {
        return Err(ApiError::bad_request("A valid orderID is required"));
    }

    let captured = state.payments.capture_order(&order_id).await?;
    if captured.status != OrderStatus::Completed {
        warn!(order_id = %order_id, status = ?captured.status, "payment not completed");
        return Err(ApiError::bad_request("Payment not completed"));
    }

    let mut paid = Vec::new();
    for product_id in captured.product_ids() {
        if is_valid_product_id(&product_id) && state.products.get(&product_id).await?.is_some() {
            paid.push(product_id);
        } else {
            warn!(order_id = %order_id, product_id = %product_id, "captured line is not a catalogue product");
        }
    }
    if paid.is_empty() {
        warn!(order_id = %order_id, "captured order has no catalogue products");
        return Err(ApiError::bad_request("Order has no products"));
    }

    // no transaction spans the capture and these inserts
    for product_id in &paid {
        match state.purchases.insert(user.id, &order_id, product_id).await? {
            Some(p) => info!(purchase_id = %p.id, order_id = %order_id, product_id = %product_id, "purchase recorded"),
            None => info!(order_id = %order_id, product_id = %product_id, "purchase already recorded"),
        }
    }

    Ok(Json(captured.into()))
}

#[instrument(skip(state))]
pub async fn verify_payment(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> ApiResult<Json<OrderResponse>> {
    if !is_valid_order_id(&order_id) {
        return Err(ApiError::bad_request("Invalid order id"));
    }
    let order = state.payments.get_order(&order_id).await?;
    Ok(Json(order.into()))
}
