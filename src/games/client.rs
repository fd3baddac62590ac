use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::config::GamesConfig;

/// Read-only game statistics source.
#[async_trait]
pub trait GameStats: Send + Sync {
    async fn games(&self, universe_ids: &str) -> Result<Value>;
    async fn thumbnails(&self, universe_ids: &str) -> Result<Value>;
}

pub struct RobloxClient {
    client: reqwest::Client,
    games_base: String,
    thumbnails_base: String,
}

impl RobloxClient {
    pub fn new(cfg: &GamesConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            games_base: cfg.games_api_base.trim_end_matches('/').to_string(),
            thumbnails_base: cfg.thumbnails_api_base.trim_end_matches('/').to_string(),
        }
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .context("Failed to make games API request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("games API error: {} - {}", status, body);
        }

        response.json().await.context("Failed to parse games API response")
    }
}

#[async_trait]
impl GameStats for RobloxClient {
    async fn games(&self, universe_ids: &str) -> Result<Value> {
        let url = format!("{}/v1/games", self.games_base);
        self.get(&url, &[("universeIds", universe_ids)]).await
    }

    async fn thumbnails(&self, universe_ids: &str) -> Result<Value> {
        let url = format!("{}/v1/games/multiget/thumbnails", self.thumbnails_base);
        self.get(
            &url,
            &[
                ("universeIds", universe_ids),
                ("size", "768x432"),
                ("format", "Png"),
                ("isCircular", "false"),
            ],
        )
        .await
    }
}
