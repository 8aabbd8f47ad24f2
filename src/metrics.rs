//! Observability: histogram metrics and timing spans for the search pipeline.
//! Histograms track p50/p95/p99 for every stage; counters track cache hits,
//! misses and failed searches.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde::Serialize;

/// Samples kept per histogram.
const RING_CAPACITY: usize = 1024;

/// Measures one pipeline stage. Records when finished or dropped, so a stage
/// cut short by `?` still shows up in its histogram.
pub struct TimingSpan {
    name: &'static str,
    start: Instant,
    registry: Option<Arc<MetricsRegistry>>,
}

impl TimingSpan {
    fn new(name: &'static str, registry: Arc<MetricsRegistry>) -> Self {
        Self {
            name,
            start: Instant::now(),
            registry: Some(registry),
        }
    }

    /// End the span and return the recorded duration in microseconds.
    pub fn finish(mut self) -> f64 {
        self.record()
    }

    fn record(&mut self) -> f64 {
        let elapsed_us = self.start.elapsed().as_micros() as f64;
        if let Some(registry) = self.registry.take() {
            registry.record(self.name, elapsed_us);
        }
        elapsed_us
    }
}

impl Drop for TimingSpan {
    fn drop(&mut self) {
        self.record();
    }
}

/// Most recent samples of one histogram, oldest first.
struct SampleRing {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl SampleRing {
    fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    /// Nearest-rank percentile, `p` in 0..=100. Zero when empty.
    fn percentile(&self, p: f64) -> f64 {
        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_by(f64::total_cmp);
        let Some(last) = sorted.len().checked_sub(1) else {
            return 0.0;
        };
        let idx = ((p / 100.0) * last as f64).round() as usize;
        sorted[idx.min(last)]
    }

    fn summary(&self) -> MetricSummary {
        MetricSummary {
            p50_us: self.percentile(50.0),
            p95_us: self.percentile(95.0),
            p99_us: self.percentile(99.0),
            count: self.len(),
        }
    }
}

/// Stores histograms and counters for all named metrics.
#[derive(Default)]
pub struct MetricsRegistry {
    histograms: Mutex<HashMap<&'static str, SampleRing>>,
    counters: Mutex<HashMap<&'static str, u64>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample (in microseconds) for the named metric.
    pub fn record(&self, name: &'static str, value_us: f64) {
        self.histograms
            .lock()
            .entry(name)
            .or_insert_with(|| SampleRing::new(RING_CAPACITY))
            .push(value_us);
        tracing::trace!(metric = name, value_us, "metric_recorded");
    }

    pub fn increment(&self, name: &'static str) {
        *self.counters.lock().entry(name).or_insert(0) += 1;
    }

    /// Start a timing span for `name`.
    pub fn span(self: &Arc<Self>, name: &'static str) -> TimingSpan {
        TimingSpan::new(name, Arc::clone(self))
    }

    #[cfg(test)]
    fn percentile(&self, name: &str, p: f64) -> f64 {
        self.histograms
            .lock()
            .get(name)
            .map_or(0.0, |ring| ring.percentile(p))
    }

    /// Snapshot of all histograms at p50/p95/p99 plus all counters.
    pub fn summary(&self) -> MetricsSnapshot {
        let histograms = self
            .histograms
            .lock()
            .iter()
            .map(|(&name, ring)| (name.to_string(), ring.summary()))
            .collect();
        let counters = self
            .counters
            .lock()
            .iter()
            .map(|(&name, &value)| (name.to_string(), value))
            .collect();

        MetricsSnapshot {
            histograms,
            counters,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricSummary {
    pub p50_us: f64,
    pub p95_us: f64,
    pub p99_us: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub histograms: HashMap<String, MetricSummary>,
    pub counters: HashMap<String, u64>,
}

/// Well-known metric names (constants to avoid typos).
pub mod metric_names {
    pub const TRANSLATE_QUERY: &str = "t_translate_query";
    pub const FOOD_LOOKUP: &str = "t_food_lookup";
    pub const RANK: &str = "t_rank";
    pub const TRANSLATE_LABELS: &str = "t_translate_labels";
    pub const SEARCH_TOTAL: &str = "t_search_total";
    pub const CACHE_HIT: &str = "translation_cache_hit";
    pub const CACHE_MISS: &str = "translation_cache_miss";
    pub const SEARCH_FAILED: &str = "search_failed";
}
