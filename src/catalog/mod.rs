//! Candidate store contract and the in-memory archive catalog.
//!
//! The matching engine only reads from a store through the four lookups
//! of [`CandidateStore`](store::CandidateStore). [`ArchiveCatalog`](store::ArchiveCatalog)
//! is the bundled implementation, backed by a JSON file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use vpk_solver::catalog::store::{ArchiveCatalog, CandidateStore};
//! use std::path::Path;
//!
//! let catalog = ArchiveCatalog::load_from_file(Path::new("known_mods.json")).unwrap();
//! for record in &catalog.records {
//!     println!("{} ({} entries)", record.label(), record.fingerprint.entry_count);
//! }
//!
//! let hits = catalog
//!     .find_by_content_signature("d41d8cd98f00b204e9800998ecf8427e")
//!     .unwrap();
//! ```
//!
//! ## Catalog format
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "created_at": "2026-01-01T00:00:00+00:00",
//!   "records": [
//!     {
//!       "id": "workshop-123456",
//!       "display_name": "HD Crates",
//!       "exact_digest": "…64 hex…",
//!       "content_signature": "…32 hex…",
//!       "fast_hash": "…16 hex…",
//!       "file_size": 81234,
//!       "entry_count": 12,
//!       "format_version": 2,
//!       "has_multiple_chunks": false,
//!       "has_inline_data": true
//!     }
//!   ]
//! }
//! ```
//!
//! Files ending in `.gz` are read and written gzip-compressed.

pub mod store;
