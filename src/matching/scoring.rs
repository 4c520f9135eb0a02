use serde::{Deserialize, Serialize};

use crate::core::fingerprint::Fingerprint;

/// Entry-count differences up to this earn the "close" bonus
pub const CLOSE_ENTRY_COUNT_DIFF: usize = 5;

/// Entry-count differences up to this earn the "near" bonus
pub const NEAR_ENTRY_COUNT_DIFF: usize = 20;

/// Points awarded for each structural agreement between a fingerprint and a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Same format version
    pub format_version: u32,
    /// Identical entry count
    pub entry_count_exact: u32,
    /// Entry counts within [`CLOSE_ENTRY_COUNT_DIFF`]
    pub entry_count_close: u32,
    /// Entry counts within [`NEAR_ENTRY_COUNT_DIFF`]
    pub entry_count_near: u32,
    /// Same "has multiple chunks" flag
    pub multiple_chunks: u32,
    /// Same "has inline data" flag
    pub inline_data: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            format_version: 30,
            entry_count_exact: 40,
            entry_count_close: 30,
            entry_count_near: 15,
            multiple_chunks: 15,
            inline_data: 15,
        }
    }
}

impl ScoringWeights {
    /// Highest score a candidate can reach with these weights
    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.format_version + self.entry_count_exact + self.multiple_chunks + self.inline_data
    }
}

/// Weighted agreement between a fingerprint and one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub format_version_match: bool,

    /// Absolute difference in entry counts
    pub entry_count_difference: usize,

    pub multiple_chunks_match: bool,

    pub inline_data_match: bool,

    /// Sum of the awarded weights
    pub total: u32,
}

impl MatchScore {
    /// Score a candidate with the default weights
    #[must_use]
    pub fn calculate(query: &Fingerprint, candidate: &Fingerprint) -> Self {
        Self::calculate_with_weights(query, candidate, &ScoringWeights::default())
    }

    /// Score a candidate with custom weights
    #[must_use]
    pub fn calculate_with_weights(
        query: &Fingerprint,
        candidate: &Fingerprint,
        weights: &ScoringWeights,
    ) -> Self {
        let format_version_match = query.format_version == candidate.format_version;
        let entry_count_difference = query.entry_count_difference(candidate);
        let multiple_chunks_match = query.has_multiple_chunks == candidate.has_multiple_chunks;
        let inline_data_match = query.has_inline_data == candidate.has_inline_data;

        let mut total = 0;
        if format_version_match {
            total += weights.format_version;
        }
        total += match entry_count_difference {
            0 => weights.entry_count_exact,
            d if d <= CLOSE_ENTRY_COUNT_DIFF => weights.entry_count_close,
            d if d <= NEAR_ENTRY_COUNT_DIFF => weights.entry_count_near,
            _ => 0,
        };
        if multiple_chunks_match {
            total += weights.multiple_chunks;
        }
        if inline_data_match {
            total += weights.inline_data;
        }

        Self {
            format_version_match,
            entry_count_difference,
            multiple_chunks_match,
            inline_data_match,
            total,
        }
    }
}

/// Index of the item with the highest key; the earliest item wins ties.
///
/// Returns `None` for an empty slice.
pub fn index_of_max<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Option<usize> {
    let mut best: Option<(usize, K)> = None;
    for (idx, item) in items.iter().enumerate() {
        let k = key(item);
        // Strictly greater, so an equal later key never displaces the earlier one
        if best.as_ref().map_or(true, |(_, best_key)| k > *best_key) {
            best = Some((idx, k));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Index of the item with the lowest key; the earliest item wins ties.
///
/// Returns `None` for an empty slice.
pub fn index_of_min<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Option<usize> {
    let mut best: Option<(usize, K)> = None;
    for (idx, item) in items.iter().enumerate() {
        let k = key(item);
        if best.as_ref().map_or(true, |(_, best_key)| k < *best_key) {
            best = Some((idx, k));
        }
    }
    best.map(|(idx, _)| idx)
}
