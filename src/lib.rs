//! # vpk-solver
//!
//! A library for identifying game-mod VPK archives by their content.
//!
//! Mod archives are routinely re-uploaded under new names, repacked with a
//! different tool, or split into numbered chunk files. A file name says little
//! about what is inside. `vpk-solver` parses the archive's directory tree,
//! derives a set of fingerprints from it, and looks them up in a catalog of
//! known archives, strongest evidence first.
//!
//! ## Features
//!
//! - **Container parsing**: VPK v1 and v2 headers, the three-level directory
//!   tree, preload data and embedded payloads
//! - **Fingerprinting**: SHA-256 of the raw bytes, an order-insensitive MD5
//!   content signature, a SeaHash fast hash, and an optional BLAKE3 block tree
//! - **Tiered matching**: exact (100%), content signature (90%), fast hash
//!   plus size (70%) and structural similarity (40%)
//! - **Deterministic ties**: the first best candidate returned by the store wins
//!
//! ## Example
//!
//! ```rust,no_run
//! use vpk_solver::{ArchiveCatalog, FingerprintEngine, MatchOutcome, MatchingEngine};
//! use std::path::Path;
//!
//! let catalog = ArchiveCatalog::load_from_file(Path::new("catalog.json")).unwrap();
//!
//! let fingerprinter = FingerprintEngine::default();
//! let (_container, fingerprint) = fingerprinter
//!     .fingerprint_file(Path::new("pak01_dir.vpk"))
//!     .unwrap();
//!
//! let engine = MatchingEngine::new(&catalog);
//! match engine.identify(&fingerprint).unwrap() {
//!     MatchOutcome::Matched(m) => println!("{} ({}%)", m.candidate.label(), m.certainty),
//!     MatchOutcome::NoMatch => println!("unknown archive"),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`parsing`]: Container reader and writer
//! - [`core`]: Data types for headers, entries, containers and fingerprints
//! - [`fingerprint`]: Fingerprint computation
//! - [`catalog`]: Candidate store trait and the JSON catalog
//! - [`matching`]: Tiered matching engine and scoring
//! - [`analysis`]: Parse, fingerprint and identify in one call
//! - [`cli`]: Command-line interface implementation

pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod fingerprint;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use analysis::{analyse_bytes, analyse_file, Analysis, AnalysisError};
pub use catalog::store::{ArchiveCatalog, CandidateStore};
pub use core::candidate::CandidateRecord;
pub use core::container::ParsedContainer;
pub use core::entry::Entry;
pub use core::fingerprint::Fingerprint;
pub use core::header::ContainerHeader;
pub use core::types::*;
pub use fingerprint::{FingerprintEngine, FingerprintError, FingerprintOptions};
pub use matching::engine::{ArchiveMatch, MatchOutcome, MatchingEngine};
pub use parsing::vpk::ParseError;
