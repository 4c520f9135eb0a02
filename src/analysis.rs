//! The full parse → fingerprint → identify pipeline.
//!
//! Parse and fingerprint failures abort before the store is queried, and a
//! store failure is carried through untouched in [`AnalysisError::Store`], so
//! callers can tell malformed input, unknown content (`NoMatch`), and an
//! unavailable store apart.

use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::catalog::store::CandidateStore;
use crate::core::container::ParsedContainer;
use crate::core::fingerprint::Fingerprint;
use crate::fingerprint::{FingerprintEngine, FingerprintError};
use crate::matching::engine::{MatchOutcome, MatchingEngine};
use crate::parsing::vpk::ParseError;

#[derive(Error, Debug)]
pub enum AnalysisError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    #[error(transparent)]
    Store(E),
}

impl<E: std::error::Error + 'static> AnalysisError<E> {
    /// Whether the input itself was rejected (bad structure or unknown version)
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::Fingerprint(FingerprintError::Container(
                ParseError::MalformedContainer(_) | ParseError::UnsupportedVersion(_)
            ))
        )
    }
}

/// Everything learned about one archive
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub container: ParsedContainer,
    pub fingerprint: Fingerprint,
    pub outcome: MatchOutcome,
}

/// Parse, fingerprint and identify an in-memory archive
///
/// # Errors
///
/// Returns `AnalysisError::Fingerprint` if the bytes are not a valid container,
/// or `AnalysisError::Store` with the store's own error if a lookup fails.
pub fn analyse_bytes<S: CandidateStore + ?Sized>(
    raw: &[u8],
    fingerprinter: &FingerprintEngine,
    matcher: &MatchingEngine<'_, S>,
) -> Result<Analysis, AnalysisError<S::Error>> {
    let (container, fingerprint) = fingerprinter.fingerprint_bytes(raw)?;
    identify(container, fingerprint, matcher)
}

/// Read, parse, fingerprint and identify an archive on disk
///
/// # Errors
///
/// Returns `AnalysisError::Fingerprint` if the file cannot be read or is not a
/// valid container, or `AnalysisError::Store` if a lookup fails.
pub fn analyse_file<S: CandidateStore + ?Sized>(
    path: &Path,
    fingerprinter: &FingerprintEngine,
    matcher: &MatchingEngine<'_, S>,
) -> Result<Analysis, AnalysisError<S::Error>> {
    let (container, fingerprint) = fingerprinter.fingerprint_file(path)?;
    identify(container, fingerprint, matcher)
}

fn identify<S: CandidateStore + ?Sized>(
    container: ParsedContainer,
    fingerprint: Fingerprint,
    matcher: &MatchingEngine<'_, S>,
) -> Result<Analysis, AnalysisError<S::Error>> {
    let outcome = matcher
        .identify(&fingerprint)
        .map_err(AnalysisError::Store)?;

    match &outcome {
        MatchOutcome::Matched(m) => info!(
            id = %m.candidate.id,
            match_type = %m.match_type,
            certainty = m.certainty,
            "Identified archive"
        ),
        MatchOutcome::NoMatch => info!(
            signature = %fingerprint.content_signature,
            "Archive not in catalog"
        ),
    }

    Ok(Analysis {
        container,
        fingerprint,
        outcome,
    })
}
