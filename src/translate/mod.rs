//! Bidirectional translation between the user's display language and the
//! food database's provider language.
//!
//! Flow per string: short-circuit heuristics → glossary → direction cache →
//! external translator (bounded by a timeout) → post-processing → cache.
//! Failures never reach the caller: the source text is returned and cached
//! as its own translation so the same failing string is not retried until
//! the entry expires.

pub mod cache;
pub mod deepl;
pub mod glossary;
pub mod normalize;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::metrics::{metric_names, MetricsRegistry};
use cache::DirectionalCache;
use glossary::Glossary;

/// Translation request sent to a backend.
#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest {
    pub source_text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// Translator trait (adapter for different backends).
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, request: &TranslateRequest) -> Result<String, TranslateError>;
}

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    Api(String),

    #[error("translation timeout")]
    Timeout,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("translation API key not configured")]
    MissingApiKey,

    #[error("translation came back empty")]
    EmptyResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Display language → provider language (search queries).
    ToProvider,
    /// Provider language → display language (result labels).
    ToDisplay,
}

/// Language codes as the translation backend expects them.
#[derive(Debug, Clone)]
pub struct LanguagePair {
    pub provider: String,
    pub display: String,
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self {
            provider: "EN".to_string(),
            display: "JA".to_string(),
        }
    }
}

pub struct TranslationService {
    translator: Option<Arc<dyn Translator>>,
    cache: Arc<DirectionalCache>,
    glossary: Arc<Glossary>,
    metrics: Arc<MetricsRegistry>,
    languages: LanguagePair,
    timeout: Duration,
}

impl TranslationService {
    /// `translator` is `None` when no API key is configured; every lookup then
    /// falls back to the source text.
    pub fn new(
        translator: Option<Arc<dyn Translator>>,
        cache: Arc<DirectionalCache>,
        glossary: Arc<Glossary>,
        metrics: Arc<MetricsRegistry>,
        languages: LanguagePair,
        timeout: Duration,
    ) -> Self {
        Self {
            translator,
            cache,
            glossary,
            metrics,
            languages,
            timeout,
        }
    }

    /// Translate a user query into the provider language.
    pub async fn to_provider_language(&self, text: &str) -> String {
        if normalize::looks_like_provider_language(text) {
            return text.to_string();
        }
        if let Some(term) = self.glossary.lookup_provider(text) {
            debug!(text, term, "glossary hit");
            return term.to_string();
        }
        self.translate_cached(text, Direction::ToProvider).await
    }

    /// Translate a provider label into the display language.
    pub async fn to_display_language(&self, text: &str) -> String {
        if normalize::needs_no_translation(text) || normalize::contains_display_script(text) {
            return text.to_string();
        }
        if let Some(term) = self.glossary.lookup_display(text) {
            debug!(text, term, "glossary hit");
            return term.to_string();
        }
        self.translate_cached(text, Direction::ToDisplay).await
    }

    async fn translate_cached(&self, text: &str, direction: Direction) -> String {
        if let Some(hit) = self.cache.get(text, direction) {
            self.metrics.increment(metric_names::CACHE_HIT);
            return hit;
        }
        self.metrics.increment(metric_names::CACHE_MISS);

        let outcome = self.call_backend(text, direction).await.and_then(|raw| {
            let processed = normalize::post_process_translation(&raw);
            if processed.trim().is_empty() {
                return Err(TranslateError::EmptyResult);
            }
            debug!(?direction, text, raw = %raw, processed = %processed, "translated");
            Ok(processed)
        });

        match outcome {
            Ok(processed) => {
                self.cache.set(text, processed.clone(), direction);
                processed
            }
            Err(e) => {
                warn!(error = %e, ?direction, text, "translation failed, using source text");
                self.cache.set(text, text.to_string(), direction);
                text.to_string()
            }
        }
    }

    async fn call_backend(&self, text: &str, direction: Direction) -> Result<String, TranslateError> {
        let translator = self
            .translator
            .as_ref()
            .ok_or(TranslateError::MissingApiKey)?;

        let (source_lang, target_lang) = match direction {
            Direction::ToProvider => (&self.languages.display, &self.languages.provider),
            Direction::ToDisplay => (&self.languages.provider, &self.languages.display),
        };
        let request = TranslateRequest {
            source_text: text.to_string(),
            source_lang: source_lang.clone(),
            target_lang: target_lang.clone(),
        };

        tokio::time::timeout(self.timeout, translator.translate(&request))
            .await
            .map_err(|_| TranslateError::Timeout)?
    }
}
