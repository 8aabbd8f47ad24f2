//! Edamam food database client (`/api/food-database/v2/parser`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{FoodDatabase, FoodDbError, ProviderCredentials, ProviderFood};

pub const DEFAULT_API_URL: &str = "https://api.edamam.com/api/food-database/v2/parser";

pub struct EdamamClient {
    http: reqwest::Client,
    api_url: String,
}

impl EdamamClient {
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, FoodDbError> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, api_url })
    }
}

#[async_trait]
impl FoodDatabase for EdamamClient {
    async fn search(
        &self,
        credentials: &ProviderCredentials,
        query: &str,
    ) -> Result<Vec<ProviderFood>, FoodDbError> {
        let resp = self
            .http
            .get(&self.api_url)
            .query(&[
                ("app_id", credentials.app_id.as_str()),
                ("app_key", credentials.app_key.as_str()),
                ("ingr", query),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FoodDbError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ParserResponse = resp.json().await?;
        let foods = parsed.into_foods();
        debug!(query, hits = foods.len(), "edamam lookup");
        Ok(foods)
    }
}

// --- Wire types ---

#[derive(Deserialize)]
struct ParserResponse {
    #[serde(default)]
    hints: Vec<Hint>,
}

#[derive(Deserialize)]
struct Hint {
    food: ProviderFood,
}

impl ParserResponse {
    fn into_foods(self) -> Vec<ProviderFood> {
        self.hints.into_iter().map(|hint| hint.food).collect()
    }
}
