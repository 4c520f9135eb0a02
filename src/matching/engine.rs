use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::store::CandidateStore;
use crate::core::candidate::CandidateRecord;
use crate::core::fingerprint::Fingerprint;
use crate::core::types::MatchType;
use crate::matching::scoring::{index_of_max, index_of_min, MatchScore, ScoringWeights};

/// A catalog record identified as the source of an archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveMatch {
    /// The matched record
    pub candidate: CandidateRecord,

    /// Fixed certainty of the tier that matched (100, 90, 70 or 40)
    pub certainty: u8,

    pub match_type: MatchType,

    /// Other records returned by the same tier, in store order
    pub alternatives: Vec<CandidateRecord>,

    /// Weighted score of the winner (fast-hash and partial-similarity tiers only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<MatchScore>,
}

impl ArchiveMatch {
    fn new(
        match_type: MatchType,
        mut candidates: Vec<CandidateRecord>,
        best: usize,
        score: Option<MatchScore>,
    ) -> Self {
        let candidate = candidates.remove(best);
        Self {
            candidate,
            certainty: match_type.certainty(),
            match_type,
            alternatives: candidates,
            score,
        }
    }
}

/// Result of identifying one fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// No tier returned a candidate
    NoMatch,
    Matched(ArchiveMatch),
}

impl MatchOutcome {
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    #[must_use]
    pub fn as_match(&self) -> Option<&ArchiveMatch> {
        match self {
            Self::Matched(m) => Some(m),
            Self::NoMatch => None,
        }
    }
}

/// Configuration for the matching engine
#[derive(Debug, Clone, Default)]
pub struct MatchingConfig {
    /// Weights used to rank candidates in the fast-hash and partial-similarity tiers
    pub scoring_weights: ScoringWeights,
}

/// Cascading matcher over a candidate store.
///
/// Tiers run strictly in order and stop at the first that returns a
/// candidate. Store errors are returned as-is.
pub struct MatchingEngine<'a, S: CandidateStore + ?Sized> {
    store: &'a S,
    config: MatchingConfig,
}

impl<'a, S: CandidateStore + ?Sized> MatchingEngine<'a, S> {
    /// Create a new matching engine with default configuration
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            config: MatchingConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(store: &'a S, config: MatchingConfig) -> Self {
        Self { store, config }
    }

    /// Identify the catalog record a fingerprint belongs to
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged if any lookup fails; later tiers
    /// are not attempted.
    pub fn identify(&self, fingerprint: &Fingerprint) -> Result<MatchOutcome, S::Error> {
        if let Some(m) = self.match_exact(fingerprint)? {
            return Ok(MatchOutcome::Matched(m));
        }
        if let Some(m) = self.match_content_signature(fingerprint)? {
            return Ok(MatchOutcome::Matched(m));
        }
        if let Some(m) = self.match_fast_hash(fingerprint)? {
            return Ok(MatchOutcome::Matched(m));
        }
        if let Some(m) = self.match_partial_similarity(fingerprint)? {
            return Ok(MatchOutcome::Matched(m));
        }

        debug!("No tier returned a candidate");
        Ok(MatchOutcome::NoMatch)
    }

    fn match_exact(&self, fingerprint: &Fingerprint) -> Result<Option<ArchiveMatch>, S::Error> {
        let Some(digest) = &fingerprint.exact_digest else {
            return Ok(None);
        };
        let found = self.store.find_by_exact_digest(digest)?;
        debug!(tier = %MatchType::Exact, found = found.is_some(), "Tier lookup");

        Ok(found.map(|candidate| ArchiveMatch::new(MatchType::Exact, vec![candidate], 0, None)))
    }

    fn match_content_signature(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<ArchiveMatch>, S::Error> {
        let candidates = self
            .store
            .find_by_content_signature(&fingerprint.content_signature)?;
        debug!(tier = %MatchType::ContentSignature, candidates = candidates.len(), "Tier lookup");

        Ok(
            index_of_min(&candidates, |c| fingerprint.entry_count_difference(&c.fingerprint)).map(
                |best| ArchiveMatch::new(MatchType::ContentSignature, candidates, best, None),
            ),
        )
    }

    fn match_fast_hash(&self, fingerprint: &Fingerprint) -> Result<Option<ArchiveMatch>, S::Error> {
        let candidates = self
            .store
            .find_by_fast_hash_and_size(&fingerprint.fast_hash, fingerprint.file_size)?;
        debug!(tier = %MatchType::FastHash, candidates = candidates.len(), "Tier lookup");

        Ok(self.select_by_score(MatchType::FastHash, fingerprint, candidates))
    }

    fn match_partial_similarity(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<ArchiveMatch>, S::Error> {
        let Some(digest) = &fingerprint.partial_digest else {
            return Ok(None);
        };
        let candidates = self.store.find_by_partial_digest(digest)?;
        let returned = candidates.len();

        // Anything sharing a stronger digest would have matched an earlier tier
        let candidates: Vec<CandidateRecord> = candidates
            .into_iter()
            .filter(|c| !shares_stronger_digest(fingerprint, &c.fingerprint))
            .collect();
        debug!(
            tier = %MatchType::PartialSimilarity,
            returned,
            candidates = candidates.len(),
            "Tier lookup"
        );

        Ok(self.select_by_score(MatchType::PartialSimilarity, fingerprint, candidates))
    }

    fn select_by_score(
        &self,
        match_type: MatchType,
        fingerprint: &Fingerprint,
        candidates: Vec<CandidateRecord>,
    ) -> Option<ArchiveMatch> {
        let weights = &self.config.scoring_weights;
        let scores: Vec<MatchScore> = candidates
            .iter()
            .map(|c| MatchScore::calculate_with_weights(fingerprint, &c.fingerprint, weights))
            .collect();
        let best = index_of_max(&scores, |s| s.total)?;
        let score = scores[best].clone();
        Some(ArchiveMatch::new(match_type, candidates, best, Some(score)))
    }
}

/// Whether a candidate shares the exact digest or content signature of the query
fn shares_stronger_digest(query: &Fingerprint, candidate: &Fingerprint) -> bool {
    let same_exact = matches!(
        (&query.exact_digest, &candidate.exact_digest),
        (Some(a), Some(b)) if a == b
    );
    same_exact || query.content_signature == candidate.content_signature
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::ArchiveCatalog;

    fn fingerprint(signature: char, fast: char) -> Fingerprint {
        Fingerprint {
            exact_digest: None,
            content_signature: signature.to_string().repeat(32),
            fast_hash: fast.to_string().repeat(16),
            file_size: 1000,
            entry_count: 10,
            format_version: 2,
            has_multiple_chunks: false,
            has_inline_data: false,
            partial_digest: None,
        }
    }

    fn record(id: &str, fp: Fingerprint) -> CandidateRecord {
        CandidateRecord::new(id, fp)
    }

    fn ids(records: &[CandidateRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.0.as_str()).collect()
    }

    #[test]
    fn test_exact_tier() {
        let mut fp = fingerprint('a', '1');
        fp.exact_digest = Some("e".repeat(64));

        let mut catalog = ArchiveCatalog::new();
        catalog.add_record(record("exact", fp.clone()));

        let outcome = MatchingEngine::new(&catalog).identify(&fp).unwrap();
        let m = outcome.as_match().unwrap();
        assert_eq!(m.match_type, MatchType::Exact);
        assert_eq!(m.certainty, 100);
        assert!(m.alternatives.is_empty());
        assert!(m.score.is_none());
    }

    #[test]
    fn test_no_exact_digest_skips_to_signature() {
        let fp = fingerprint('a', '1');
        let mut catalog = ArchiveCatalog::new();
        let mut stored = fp.clone();
        stored.exact_digest = Some("e".repeat(64));
        catalog.add_record(record("stored", stored));

        let outcome = MatchingEngine::new(&catalog).identify(&fp).unwrap();
        assert_eq!(outcome.as_match().unwrap().match_type, MatchType::ContentSignature);
    }

    #[test]
    fn test_signature_tier_prefers_closest_entry_count() {
        let query = fingerprint('a', '1');
        let mut far = fingerprint('a', '2');
        far.entry_count = 30;
        let mut close = fingerprint('a', '3');
        close.entry_count = 12;
        let mut also_close = fingerprint('a', '4');
        also_close.entry_count = 8;

        let mut catalog = ArchiveCatalog::new();
        catalog.add_record(record("far", far));
        catalog.add_record(record("close", close));
        catalog.add_record(record("also_close", also_close));

        let outcome = MatchingEngine::new(&catalog).identify(&query).unwrap();
        let m = outcome.as_match().unwrap();
        assert_eq!(m.certainty, 90);
        assert_eq!(m.candidate.id.0, "close");
        assert_eq!(ids(&m.alternatives), vec!["far", "also_close"]);
    }

    #[test]
    fn test_fast_hash_tier_uses_weighted_score() {
        let query = fingerprint('a', '1');
        let mut weak = fingerprint('b', '1');
        weak.format_version = 1;
        let strong = fingerprint('c', '1');

        let mut catalog = ArchiveCatalog::new();
        catalog.add_record(record("weak", weak));
        catalog.add_record(record("strong", strong));

        let outcome = MatchingEngine::new(&catalog).identify(&query).unwrap();
        let m = outcome.as_match().unwrap();
        assert_eq!(m.match_type, MatchType::FastHash);
        assert_eq!(m.certainty, 70);
        assert_eq!(m.candidate.id.0, "strong");
        assert_eq!(m.score.as_ref().unwrap().total, 100);
        assert_eq!(ids(&m.alternatives), vec!["weak"]);
    }

    #[test]
    fn test_fast_hash_requires_same_size() {
        let query = fingerprint('a', '1');
        let mut other = fingerprint('b', '1');
        other.file_size = 999;

        let mut catalog = ArchiveCatalog::new();
        catalog.add_record(record("other", other));

        let outcome = MatchingEngine::new(&catalog).identify(&query).unwrap();
        assert_eq!(outcome, MatchOutcome::NoMatch);
    }

    #[test]
    fn test_partial_tier_skipped_without_digest() {
        let query = fingerprint('a', '1');
        let mut near = fingerprint('b', '2');
        near.partial_digest = Some("p".repeat(64));

        let mut catalog = ArchiveCatalog::new();
        catalog.add_record(record("near", near));

        let outcome = MatchingEngine::new(&catalog).identify(&query).unwrap();
        assert!(!outcome.is_match());
    }

    #[test]
    fn test_partial_tier_matches_near_duplicate() {
        let mut query = fingerprint('a', '1');
        query.partial_digest = Some("f".repeat(64));
        let mut near = fingerprint('b', '2');
        near.partial_digest = Some("f".repeat(64));

        let mut catalog = ArchiveCatalog::new();
        catalog.add_record(record("near", near));

        let outcome = MatchingEngine::new(&catalog).identify(&query).unwrap();
        let m = outcome.as_match().unwrap();
        assert_eq!(m.match_type, MatchType::PartialSimilarity);
        assert_eq!(m.certainty, 40);
    }

    #[test]
    fn test_shares_stronger_digest() {
        let mut query = fingerprint('a', '1');
        let mut other = fingerprint('b', '2');
        assert!(!shares_stronger_digest(&query, &other));

        query.exact_digest = Some("e".repeat(64));
        other.exact_digest = Some("e".repeat(64));
        assert!(shares_stronger_digest(&query, &other));

        other.exact_digest = None;
        other.content_signature = query.content_signature.clone();
        assert!(shares_stronger_digest(&query, &other));
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_value(MatchOutcome::NoMatch).unwrap();
        assert_eq!(json["outcome"], "no_match");
    }
}
