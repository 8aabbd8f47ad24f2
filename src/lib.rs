//! meal-search: food search service for the meal log.
//! Main library: context wiring, router, server lifecycle.

pub mod config;
pub mod error;
pub mod food;
pub mod metrics;
pub mod routes;
pub mod search;
pub mod translate;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, signal};
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use food::edamam::EdamamClient;
use metrics::MetricsRegistry;
use search::FoodSearch;
use translate::cache::{spawn_sweep_loop, DirectionalCache};
use translate::deepl::DeepLClient;
use translate::glossary::Glossary;
use translate::{TranslationService, Translator};

/// Shared application state handed to every handler.
pub struct AppContext {
    pub search: FoodSearch,
    pub metrics: Arc<MetricsRegistry>,
    pub cache: Arc<DirectionalCache>,
}

impl AppContext {
    /// Build the production context: DeepL translator, Edamam client, glossary.
    pub fn from_config(config: &Config) -> Result<Self, food::FoodDbError> {
        let metrics = Arc::new(MetricsRegistry::new());
        let cache = Arc::new(DirectionalCache::new(config.cache_ttl));

        let glossary = Arc::new(
            Glossary::load_from_file(&config.glossary_path).unwrap_or_else(|e| {
                warn!(error = %e, path = %config.glossary_path.display(), "glossary load failed, using empty");
                Glossary::empty()
            }),
        );
        info!(version = glossary.version(), terms = glossary.len(), "glossary ready");

        let translator: Option<Arc<dyn Translator>> = match &config.deepl_api_key {
            Some(key) => match DeepLClient::new(
                key.clone(),
                config.deepl_api_url.clone(),
                config.translate_timeout,
            ) {
                Ok(client) => {
                    info!("DeepL API client initialized");
                    Some(Arc::new(client) as Arc<dyn Translator>)
                }
                Err(e) => {
                    warn!(error = %e, "DeepL client init failed, translation disabled");
                    None
                }
            },
            None => {
                warn!("DEEPL_API_KEY missing, translation disabled");
                None
            }
        };

        let translation = Arc::new(TranslationService::new(
            translator,
            Arc::clone(&cache),
            glossary,
            Arc::clone(&metrics),
            config.languages.clone(),
            config.translate_timeout,
        ));

        let food_db = Arc::new(EdamamClient::new(
            config.edamam_api_url.clone(),
            config.food_db_timeout,
        )?);

        let search = FoodSearch::new(
            translation,
            food_db,
            config.credentials(),
            Arc::clone(&metrics),
            config.max_results,
        );

        Ok(Self {
            search,
            metrics,
            cache,
        })
    }
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(routes::health_handler))
        .route("/api/foods/search", get(routes::search_handler))
        .route("/metrics", get(routes::metrics_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            },
        ))
        .with_state(ctx)
}

/// Load config, wire the pipeline, and serve until Ctrl+C / SIGTERM.
pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("meal_search=debug,tower_http=info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("meal-search starting");

    let config = Config::from_env()?;
    let ctx = Arc::new(AppContext::from_config(&config)?);

    let shutdown = CancellationToken::new();
    if let Some(interval) = config.cache_sweep_interval {
        spawn_sweep_loop(Arc::clone(&ctx.cache), interval, shutdown.clone());
        info!(interval_secs = interval.as_secs(), "translation cache sweep started");
    }

    let app = build_router(ctx);

    let address = config.address();
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown.cancel();
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
