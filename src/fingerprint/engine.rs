use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::core::container::ParsedContainer;
use crate::core::fingerprint::Fingerprint;
use crate::fingerprint::fast_hash::compute_fast_hash;
use crate::fingerprint::partial::{compute_partial_digest, DEFAULT_BLOCK_SIZE};
use crate::fingerprint::signature::compute_content_signature;
use crate::parsing::vpk::{parse_bytes, ParseError};

#[derive(Error, Debug)]
pub enum FingerprintError {
    #[error(transparent)]
    Container(#[from] ParseError),

    #[error("Failed to read {path} for hashing: {source}")]
    DigestComputationFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Which of the expensive digests to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerprintOptions {
    /// Hash the whole raw buffer with SHA-256
    pub include_exact_digest: bool,
    /// Build the block-tree digest over entry contents
    pub include_partial_digest: bool,
    /// Block size for the partial digest
    pub block_size: usize,
}

impl Default for FingerprintOptions {
    fn default() -> Self {
        Self {
            include_exact_digest: true,
            include_partial_digest: false,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl FingerprintOptions {
    /// Only the cheap digests (content signature and fast hash)
    #[must_use]
    pub fn cheap() -> Self {
        Self {
            include_exact_digest: false,
            include_partial_digest: false,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }

    /// Every digest, including the partial-similarity one
    #[must_use]
    pub fn full() -> Self {
        Self {
            include_exact_digest: true,
            include_partial_digest: true,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

/// SHA-256 of the raw bytes as lowercase hex
#[must_use]
pub fn compute_exact_digest(raw: &[u8]) -> String {
    hex::encode(Sha256::digest(raw))
}

/// Derives fingerprints from parsed containers
#[derive(Debug, Clone, Default)]
pub struct FingerprintEngine {
    options: FingerprintOptions,
}

impl FingerprintEngine {
    #[must_use]
    pub fn new(options: FingerprintOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &FingerprintOptions {
        &self.options
    }

    /// Compute the fingerprint of a container parsed from `raw`.
    ///
    /// The expensive digests run alongside the cheap structural ones.
    ///
    /// # Errors
    ///
    /// Returns `FingerprintError::Container` if an embedded payload needed by
    /// the partial digest lies outside `raw`.
    pub fn compute(
        &self,
        container: &ParsedContainer,
        raw: &[u8],
    ) -> Result<Fingerprint, FingerprintError> {
        let opts = self.options;

        let ((exact_digest, partial), (content_signature, fast_hash)) = rayon::join(
            || {
                rayon::join(
                    || opts.include_exact_digest.then(|| compute_exact_digest(raw)),
                    || {
                        opts.include_partial_digest
                            .then(|| compute_partial_digest(container, raw, opts.block_size))
                            .transpose()
                    },
                )
            },
            || {
                (
                    compute_content_signature(&container.entries),
                    compute_fast_hash(&container.entries),
                )
            },
        );
        let partial = partial?;

        debug!(
            entries = container.entry_count(),
            signature = %content_signature,
            fast_hash = %fast_hash,
            exact = exact_digest.is_some(),
            partial_blocks = partial.as_ref().map_or(0, |p| p.block_count),
            "Computed fingerprint"
        );

        Ok(Fingerprint {
            exact_digest,
            content_signature,
            fast_hash,
            file_size: raw.len() as u64,
            entry_count: container.entry_count(),
            format_version: container.header.version,
            has_multiple_chunks: container.has_multiple_chunks(),
            has_inline_data: container.has_inline_data(),
            partial_digest: partial.map(|p| p.to_hex()),
        })
    }

    /// Parse and fingerprint a raw buffer
    ///
    /// # Errors
    ///
    /// Returns `FingerprintError::Container` if the buffer is not a valid container.
    pub fn fingerprint_bytes(
        &self,
        raw: &[u8],
    ) -> Result<(ParsedContainer, Fingerprint), FingerprintError> {
        let container = parse_bytes(raw)?;
        let fingerprint = self.compute(&container, raw)?;
        Ok((container, fingerprint))
    }

    /// Read, parse and fingerprint a file
    ///
    /// # Errors
    ///
    /// Returns `FingerprintError::DigestComputationFailure` if the file cannot be
    /// read, or `FingerprintError::Container` if it is not a valid container.
    pub fn fingerprint_file(
        &self,
        path: &Path,
    ) -> Result<(ParsedContainer, Fingerprint), FingerprintError> {
        let raw = std::fs::read(path).map_err(|source| FingerprintError::DigestComputationFailure {
            path: path.display().to_string(),
            source,
        })?;
        let (container, fingerprint) = self.fingerprint_bytes(&raw)?;
        Ok((container.with_source(path.display().to_string()), fingerprint))
    }
}
