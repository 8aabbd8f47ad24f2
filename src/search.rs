//! Food search pipeline.
//!
//! query → translate to provider language → food database lookup → rank →
//! translate surviving labels back to the display language (concurrently).
//! Linear, no retries. Translation never fails the request; a food database
//! failure does.

use std::sync::Arc;

use futures_util::future::join_all;
use thiserror::Error;
use tracing::{error, info};

use crate::food::ranking::{self, ScoredCandidate};
use crate::food::{FoodCandidate, FoodDatabase, FoodDbError, ProviderCredentials};
use crate::metrics::{metric_names, MetricsRegistry};
use crate::translate::normalize;
use crate::translate::TranslationService;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("missing search query")]
    MissingQuery,

    #[error("food database credentials are not configured")]
    MissingCredentials,

    #[error("food lookup failed: {0}")]
    Lookup(#[from] FoodDbError),
}

pub struct FoodSearch {
    translation: Arc<TranslationService>,
    food_db: Arc<dyn FoodDatabase>,
    credentials: Option<ProviderCredentials>,
    metrics: Arc<MetricsRegistry>,
    max_results: usize,
}

impl FoodSearch {
    pub fn new(
        translation: Arc<TranslationService>,
        food_db: Arc<dyn FoodDatabase>,
        credentials: Option<ProviderCredentials>,
        metrics: Arc<MetricsRegistry>,
        max_results: usize,
    ) -> Self {
        Self {
            translation,
            food_db,
            credentials,
            metrics,
            max_results,
        }
    }

    /// Run one search. `None` or a blank query is a [`SearchError::MissingQuery`].
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<FoodCandidate>, SearchError> {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or(SearchError::MissingQuery)?;

        let Some(credentials) = self.credentials.as_ref() else {
            error!("food database credentials missing, check EDAMAM_APP_ID / EDAMAM_APP_KEY");
            return Err(SearchError::MissingCredentials);
        };

        let total = self.metrics.span(metric_names::SEARCH_TOTAL);

        let span = self.metrics.span(metric_names::TRANSLATE_QUERY);
        let translated = self.translation.to_provider_language(query).await;
        span.finish();

        if is_degenerate_translation(query, &translated) {
            info!(query, "query could not be translated, returning no results");
            total.finish();
            return Ok(Vec::new());
        }

        let span = self.metrics.span(metric_names::FOOD_LOOKUP);
        let foods = self
            .food_db
            .search(credentials, &translated)
            .await
            .map_err(|e| {
                self.metrics.increment(metric_names::SEARCH_FAILED);
                error!(error = %e, query, translated = %translated, "food database lookup failed");
                e
            })?;
        span.finish();

        let span = self.metrics.span(metric_names::RANK);
        let ranked = ranking::rank(foods, query, &translated, self.max_results);
        span.finish();

        let span = self.metrics.span(metric_names::TRANSLATE_LABELS);
        let results = join_all(ranked.into_iter().map(|c| self.localize(c))).await;
        span.finish();

        let elapsed_us = total.finish();
        info!(
            query,
            translated = %translated,
            results = results.len(),
            elapsed_ms = elapsed_us / 1000.0,
            "food search complete"
        );
        Ok(results)
    }

    async fn localize(&self, candidate: ScoredCandidate) -> FoodCandidate {
        let food = candidate.food;
        let label = self.translation.to_display_language(&food.label).await;
        FoodCandidate {
            food_id: food.food_id,
            label,
            original_label: food.label,
            nutrients: food.nutrients.into(),
        }
    }
}

/// The translator handed the query back unchanged although it is not plain
/// provider-language text: searching with it would be pointless.
fn is_degenerate_translation(query: &str, translated: &str) -> bool {
    translated == query && !normalize::is_ascii_letters_only(query)
}
