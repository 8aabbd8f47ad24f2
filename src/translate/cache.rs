//! In-memory translation cache with TTL.
//! Key: the exact source string. One map per translation direction.
//! Unbounded; entries live until they expire and a sweep removes them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::Direction;

/// Default expiry window: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 3600);

struct CacheEntry {
    translated_text: String,
    inserted_at: Instant,
}

pub(crate) struct TranslationCache {
    inner: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl TranslationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up a cached translation. Returns None if absent or expired.
    pub fn get(&self, text: &str) -> Option<String> {
        let cache = self.inner.lock();
        let entry = cache.get(text)?;
        if entry.inserted_at.elapsed() < self.ttl {
            return Some(entry.translated_text.clone());
        }
        None
    }

    /// Store a translation, overwriting any previous entry and resetting its age.
    pub fn insert(&self, text: &str, translated_text: String) {
        let mut cache = self.inner.lock();
        cache.insert(
            text.to_string(),
            CacheEntry {
                translated_text,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Remove expired entries, returning how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        let mut cache = self.inner.lock();
        let before = cache.len();
        cache.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        before - cache.len()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().len()
    }
}

/// The two independent caches, one per translation direction.
/// The same literal string never shares a slot across directions.
pub struct DirectionalCache {
    to_provider: TranslationCache,
    to_display: TranslationCache,
}

impl DirectionalCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            to_provider: TranslationCache::new(ttl),
            to_display: TranslationCache::new(ttl),
        }
    }

    fn direction(&self, direction: Direction) -> &TranslationCache {
        match direction {
            Direction::ToProvider => &self.to_provider,
            Direction::ToDisplay => &self.to_display,
        }
    }

    pub fn get(&self, text: &str, direction: Direction) -> Option<String> {
        self.direction(direction).get(text)
    }

    pub fn set(&self, text: &str, translated: String, direction: Direction) {
        self.direction(direction).insert(text, translated);
    }

    #[cfg(test)]
    pub(crate) fn len(&self, direction: Direction) -> usize {
        self.direction(direction).len()
    }

    pub fn sweep_expired(&self) -> usize {
        self.to_provider.sweep_expired() + self.to_display.sweep_expired()
    }
}

/// Start a background sweep loop. Stops when `shutdown` is cancelled.
pub fn spawn_sweep_loop(
    cache: Arc<DirectionalCache>,
    interval: Duration,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // first tick completes immediately
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = cache.sweep_expired();
                    if removed > 0 {
                        info!(removed, "translation cache sweep");
                    }
                }
                _ = shutdown.cancelled() => {
                    debug!("translation cache sweep stopped");
                    break;
                }
            }
        }
    })
}
