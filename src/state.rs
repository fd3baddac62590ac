use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::auth::repo::{PgUserRepo, UserRepo};
use crate::config::AppConfig;
use crate::games::client::{GameStats, RobloxClient};
use crate::payments::{PayPalClient, PaymentGateway};
use crate::products::repo::{PgProductRepo, ProductRepo};
use crate::purchases::repo::{PgPurchaseRepo, PurchaseRepo};
use crate::storage::{Storage, StorageClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub purchases: Arc<dyn PurchaseRepo>,
    pub products: Arc<dyn ProductRepo>,
    pub storage: Arc<dyn StorageClient>,
    pub payments: Arc<dyn PaymentGateway>,
    pub games: Arc<dyn GameStats>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        // Run migrations if present
        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        let storage = Arc::new(
            Storage::new(&config.storage)
                .await
                .context("init object storage")?,
        ) as Arc<dyn StorageClient>;

        Ok(Self {
            users: Arc::new(PgUserRepo::new(db.clone())),
            purchases: Arc::new(PgPurchaseRepo::new(db.clone())),
            products: Arc::new(PgProductRepo::new(db)),
            storage,
            payments: Arc::new(PayPalClient::new(&config.paypal)),
            games: Arc::new(RobloxClient::new(&config.games)),
            config,
        })
    }
}
