//! Identity digests for parsed containers.
//!
//! A [`Fingerprint`](crate::core::fingerprint::Fingerprint) bundles four
//! independent digests, from strongest to weakest guarantee:
//!
//! | Digest | Algorithm | Always computed | Order-sensitive |
//! |--------|-----------|-----------------|-----------------|
//! | Exact | SHA-256 of the raw bytes | No | n/a |
//! | Content signature | MD5 of sorted `path:crc:size` lines | Yes | No |
//! | Fast hash (+ size) | seahash of the entry summary | Yes | Yes |
//! | Partial similarity | BLAKE3 block tree over entry contents | No | No |
//!
//! ## Example
//!
//! ```rust,no_run
//! use vpk_solver::fingerprint::{FingerprintEngine, FingerprintOptions};
//! use std::path::Path;
//!
//! let engine = FingerprintEngine::new(FingerprintOptions::full());
//! let (container, fingerprint) = engine
//!     .fingerprint_file(Path::new("pak01_dir.vpk"))
//!     .unwrap();
//! println!("{} entries, signature {}", container.entry_count(), fingerprint.content_signature);
//! ```

pub mod engine;
pub mod fast_hash;
pub mod partial;
pub mod signature;

pub use engine::{FingerprintEngine, FingerprintError, FingerprintOptions};
