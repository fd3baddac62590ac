use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalogue entry. `file_key` points at the blob served after purchase.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    #[serde(skip_serializing)]
    pub file_key: String,
    pub file_name: String,
}
