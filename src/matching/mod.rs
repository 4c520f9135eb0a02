//! Archive matching engine and scoring.
//!
//! This module provides the core matching functionality:
//!
//! - [`MatchingEngine`](engine::MatchingEngine): Main entry point for identifying an archive
//! - [`MatchOutcome`](engine::MatchOutcome): Either no match or the winning record plus alternatives
//! - [`MatchScore`](scoring::MatchScore): Weighted structural agreement used to rank candidates
//!
//! ## Matching Algorithm
//!
//! Four tiers are tried in order; the first tier that returns a candidate decides:
//!
//! | Tier | Lookup | Certainty | Ranking |
//! |------|--------|-----------|---------|
//! | 1 | Exact digest | 100 | single record |
//! | 2 | Content signature | 90 | closest entry count |
//! | 3 | Fast hash + file size | 70 | weighted score |
//! | 4 | Partial-similarity digest | 40 | weighted score, stronger matches excluded |
//!
//! Tier 1 needs an exact digest and tier 4 a partial digest on the
//! fingerprint; without them those tiers are skipped. Ties always go to the
//! candidate the store returned first.
//!
//! ## Scoring
//!
//! | Agreement | Points |
//! |-----------|--------|
//! | Same format version | 30 |
//! | Same entry count / within 5 / within 20 | 40 / 30 / 15 |
//! | Same "multiple chunks" flag | 15 |
//! | Same "inline data" flag | 15 |
//!
//! ## Example
//!
//! ```rust,no_run
//! use vpk_solver::catalog::store::ArchiveCatalog;
//! use vpk_solver::fingerprint::{FingerprintEngine, FingerprintOptions};
//! use vpk_solver::matching::engine::{MatchOutcome, MatchingEngine};
//! use std::path::Path;
//!
//! let catalog = ArchiveCatalog::load_from_file(Path::new("known_mods.json")).unwrap();
//! let (_, fingerprint) = FingerprintEngine::new(FingerprintOptions::full())
//!     .fingerprint_file(Path::new("pak01_dir.vpk"))
//!     .unwrap();
//!
//! match MatchingEngine::new(&catalog).identify(&fingerprint).unwrap() {
//!     MatchOutcome::Matched(m) => println!("{} ({}%)", m.candidate.label(), m.certainty),
//!     MatchOutcome::NoMatch => println!("unknown archive"),
//! }
//! ```

pub mod engine;
pub mod scoring;
