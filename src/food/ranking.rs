//! Relevance scoring for food database hits.
//!
//! Additive point scheme, case-insensitive, against each food's preferred
//! label: exact match 100, whole-query substring 50, otherwise 25 per query
//! word (longer than two characters) found in the label. Sorting is stable,
//! so ties keep provider order.

use tracing::debug;

use super::ProviderFood;

pub const DEFAULT_MAX_RESULTS: usize = 5;

const EXACT_SCORE: u32 = 100;
const SUBSTRING_SCORE: u32 = 50;
const WORD_SCORE: u32 = 25;
/// Query words must be longer than this to count.
const MIN_WORD_CHARS: usize = 2;

#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub food: ProviderFood,
    pub score: u32,
}

/// Score one label against the translated query.
pub fn score(label: &str, translated_query: &str) -> u32 {
    let label = label.to_lowercase();
    let query = translated_query.trim().to_lowercase();

    if label == query {
        return EXACT_SCORE;
    }
    if label.contains(&query) {
        return SUBSTRING_SCORE;
    }
    query
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_WORD_CHARS && label.contains(word))
        .map(|_| WORD_SCORE)
        .sum()
}

/// Score, sort descending, and keep at most `max_results`.
pub fn rank(
    candidates: Vec<ProviderFood>,
    original_query: &str,
    translated_query: &str,
    max_results: usize,
) -> Vec<ScoredCandidate> {
    let total = candidates.len();
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|food| {
            let score = score(food.preferred_label(), translated_query);
            ScoredCandidate { food, score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(max_results);

    debug!(
        original_query,
        translated_query,
        total,
        kept = scored.len(),
        top_score = scored.first().map(|c| c.score),
        "ranked candidates"
    );
    scored
}
