use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ApiError, ApiResult};
use crate::orders::dto::LineItem;
use crate::payments::OrderLine;
use crate::products::{repo_types::Product, services::is_valid_product_id};

/// Rejects empty carts, bad product ids and non-positive quantities.
pub fn check_cart(items: &[LineItem]) -> ApiResult<()> {
    if items.is_empty() {
        return Err(ApiError::bad_request("Cart is empty"));
    }
    for item in items {
        if !is_valid_product_id(&item.id) {
            return Err(ApiError::bad_request("Invalid product id"));
        }
        if item.quantity <= 0 {
            return Err(ApiError::bad_request("Quantity must be positive"));
        }
    }
    Ok(())
}

/// Sum of quantity × catalogue price, in cents.
pub fn order_total_cents(lines: &[(Product, i64)]) -> ApiResult<i64> {
    let mut total: i64 = 0;
    for (product, quantity) in lines {
        total = product
            .price_cents
            .checked_mul(*quantity)
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| ApiError::bad_request("Order total too large"))?;
    }

    if total <= 0 {
        return Err(ApiError::bad_request("Order total must be positive"));
    }
    Ok(total)
}

pub fn order_lines(lines: &[(Product, i64)]) -> Vec<OrderLine> {
    lines
        .iter()
        .map(|(product, quantity)| OrderLine {
            product_id: product.id.clone(),
            name: product.title.clone(),
            quantity: *quantity,
            unit_amount: format_amount(product.price_cents),
        })
        .collect()
}

/// `1999` → `"19.99"`.
pub fn format_amount(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Processor order ids are alphanumeric with dashes; anything else never
/// reaches the API path.
pub fn is_valid_order_id(id: &str) -> bool {
    lazy_static! {
        static ref ORDER_ID_RE: Regex = Regex::new(r"^[A-Za-z0-9-]{1,64}$").unwrap();
    }
    ORDER_ID_RE.is_match(id)
}
