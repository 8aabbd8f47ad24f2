use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{info_span, Instrument};

use crate::{error::AppError, food::FoodCandidate, metrics::MetricsSnapshot, AppContext};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
}

/// `GET /api/foods/search?query=...`
pub async fn search_handler(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<FoodCandidate>>, AppError> {
    let request_id = uuid::Uuid::new_v4();
    let results = ctx
        .search
        .search(params.query.as_deref())
        .instrument(info_span!("food_search", %request_id))
        .await?;

    Ok(Json(results))
}

pub async fn metrics_handler(State(ctx): State<Arc<AppContext>>) -> Json<MetricsSnapshot> {
    Json(ctx.metrics.summary())
}

pub async fn health_handler() -> &'static str {
    "ok"
}
