use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::StoreError;
use crate::purchases::repo_types::Purchase;

#[async_trait]
pub trait PurchaseRepo: Send + Sync {
    /// Records a purchase. `Ok(None)` when this order already recorded the product.
    async fn insert(
        &self,
        user_id: Uuid,
        order_id: &str,
        product_id: &str,
    ) -> Result<Option<Purchase>, StoreError>;

    async fn find_for_user_product(
        &self,
        user_id: Uuid,
        product_id: &str,
    ) -> Result<Option<Purchase>, StoreError>;

    /// Newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Purchase>, StoreError>;

    /// Stamps the download time, never moving it backwards. Returns the stored value.
    async fn mark_downloaded(&self, purchase_id: Uuid) -> Result<OffsetDateTime, StoreError>;
}

#[derive(Clone)]
pub struct PgPurchaseRepo {
    db: PgPool,
}

impl PgPurchaseRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PurchaseRepo for PgPurchaseRepo {
    async fn insert(
        &self,
        user_id: Uuid,
        order_id: &str,
        product_id: &str,
    ) -> Result<Option<Purchase>, StoreError> {
        let row = sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (user_id, order_id, product_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (order_id, product_id) DO NOTHING
            RETURNING id, user_id, order_id, product_id, purchase_date, last_download
            "#,
        )
        .bind(user_id)
        .bind(order_id)
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_for_user_product(
        &self,
        user_id: Uuid,
        product_id: &str,
    ) -> Result<Option<Purchase>, StoreError> {
        let row = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, user_id, order_id, product_id, purchase_date, last_download
              FROM purchases
             WHERE user_id = $1 AND product_id = $2
             ORDER BY purchase_date DESC
             LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Purchase>, StoreError> {
        let rows = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, user_id, order_id, product_id, purchase_date, last_download
              FROM purchases
             WHERE user_id = $1
             ORDER BY purchase_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn mark_downloaded(&self, purchase_id: Uuid) -> Result<OffsetDateTime, StoreError> {
        // GREATEST skips NULL, so the first download just takes now()
        let stamped = sqlx::query_scalar::<_, OffsetDateTime>(
            r#"
            UPDATE purchases
               SET last_download = GREATEST(last_download, now())
             WHERE id = $1
            RETURNING last_download
            "#,
        )
        .bind(purchase_id)
        .fetch_one(&self.db)
        .await?;
        Ok(stamped)
    }
}
