//! In-memory translator and food database for driving the router in tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{body::Body, http::Request, http::StatusCode, Router};
use parking_lot::Mutex;
use tower::ServiceExt;

use meal_search::food::{
    FoodDatabase, FoodDbError, ProviderCredentials, ProviderFood, ProviderNutrients,
};
use meal_search::metrics::MetricsRegistry;
use meal_search::search::FoodSearch;
use meal_search::translate::cache::{DirectionalCache, DEFAULT_TTL};
use meal_search::translate::glossary::Glossary;
use meal_search::translate::{
    LanguagePair, TranslateError, TranslateRequest, TranslationService, Translator,
};
use meal_search::{build_router, AppContext};

#[derive(Default)]
pub struct FakeTranslator {
    responses: HashMap<String, String>,
    calls: AtomicUsize,
}

impl FakeTranslator {
    pub fn with(pairs: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            responses: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, request: &TranslateRequest) -> Result<String, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(&request.source_text)
            .cloned()
            .ok_or_else(|| TranslateError::Api("503 Service Unavailable".into()))
    }
}

pub struct FakeFoodDb {
    foods: Vec<ProviderFood>,
    fail_status: Option<u16>,
    calls: AtomicUsize,
    last_query: Mutex<Option<String>>,
}

impl FakeFoodDb {
    pub fn with(foods: Vec<ProviderFood>) -> Arc<Self> {
        Arc::new(Self {
            foods,
            fail_status: None,
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            foods: Vec::new(),
            fail_status: Some(status),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().clone()
    }
}

#[async_trait]
impl FoodDatabase for FakeFoodDb {
    async fn search(
        &self,
        _credentials: &ProviderCredentials,
        query: &str,
    ) -> Result<Vec<ProviderFood>, FoodDbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock() = Some(query.to_string());
        match self.fail_status {
            Some(status) => Err(FoodDbError::Api {
                status,
                body: "{\"status\":\"error\",\"message\":\"Unauthorized app_id\"}".into(),
            }),
            None => Ok(self.foods.clone()),
        }
    }
}

pub fn food(id: &str, label: &str, kcal: f64) -> ProviderFood {
    ProviderFood {
        food_id: id.to_string(),
        label: label.to_string(),
        known_as: None,
        nutrients: ProviderNutrients {
            energy_kcal: kcal,
            protein: 1.0,
            fat: 2.0,
            carbohydrate: 3.0,
        },
    }
}

pub fn credentials() -> Option<ProviderCredentials> {
    ProviderCredentials::from_parts(Some("test-id".into()), Some("test-key".into()))
}

pub fn router(
    translator: Arc<FakeTranslator>,
    food_db: Arc<FakeFoodDb>,
    credentials: Option<ProviderCredentials>,
) -> Router {
    let metrics = Arc::new(MetricsRegistry::new());
    let cache = Arc::new(DirectionalCache::new(DEFAULT_TTL));
    let translation = Arc::new(TranslationService::new(
        Some(translator as Arc<dyn Translator>),
        Arc::clone(&cache),
        Arc::new(Glossary::empty()),
        Arc::clone(&metrics),
        LanguagePair::default(),
        Duration::from_secs(10),
    ));
    let search = FoodSearch::new(translation, food_db, credentials, Arc::clone(&metrics), 5);

    build_router(Arc::new(AppContext {
        search,
        metrics,
        cache,
    }))
}

/// Search path with `query` percent-encoded.
pub fn search_uri(query: &str) -> String {
    let url = reqwest::Url::parse_with_params("http://localhost/api/foods/search", &[("query", query)])
        .unwrap();
    format!("{}?{}", url.path(), url.query().unwrap_or_default())
}

pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
