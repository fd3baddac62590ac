use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A paid-for product and its download history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Purchase {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_id: String, // payment processor order
    pub product_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub purchase_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_download: Option<OffsetDateTime>,
}
