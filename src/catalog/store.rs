use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::core::candidate::CandidateRecord;
use crate::core::types::ArchiveId;
use crate::utils::validation::{
    normalize_digest, CONTENT_SIGNATURE_HEX_LEN, DIGEST_HEX_LEN, FAST_HASH_HEX_LEN,
};

/// Read contract the matching engine requires of a catalog.
///
/// Implementations may be in-memory, database-backed or remote. Errors are
/// returned to the engine's caller untouched.
pub trait CandidateStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// At most one record is expected per exact digest
    fn find_by_exact_digest(&self, digest: &str) -> Result<Option<CandidateRecord>, Self::Error>;

    fn find_by_content_signature(
        &self,
        signature: &str,
    ) -> Result<Vec<CandidateRecord>, Self::Error>;

    fn find_by_fast_hash_and_size(
        &self,
        fast_hash: &str,
        file_size: u64,
    ) -> Result<Vec<CandidateRecord>, Self::Error>;

    fn find_by_partial_digest(&self, digest: &str) -> Result<Vec<CandidateRecord>, Self::Error>;
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    pub created_at: String,
    pub records: Vec<CandidateRecord>,
}

/// In-memory catalog of known archives, indexed by every fingerprint key
#[derive(Debug, Default)]
pub struct ArchiveCatalog {
    /// All known archives, in insertion order
    pub records: Vec<CandidateRecord>,

    /// Index: archive ID -> index in records vec
    id_to_index: HashMap<ArchiveId, usize>,

    /// Index: exact digest -> first record carrying it
    exact_to_record: HashMap<String, usize>,

    /// Index: content signature -> records, in insertion order
    signature_to_records: HashMap<String, Vec<usize>>,

    /// Index: (fast hash, file size) -> records, in insertion order
    fast_hash_to_records: HashMap<(String, u64), Vec<usize>>,

    /// Index: partial digest -> records, in insertion order
    partial_to_records: HashMap<String, Vec<usize>>,
}

impl ArchiveCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load catalog from a JSON file, gzip-compressed when the name ends in `.gz`
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ReadError` if the file cannot be read or
    /// decompressed, or `CatalogError::ParseError` if it is not a valid catalog.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = if is_gzip_path(path) {
            let mut decoder = GzDecoder::new(std::fs::File::open(path)?);
            let mut content = String::new();
            decoder.read_to_string(&mut content)?;
            content
        } else {
            std::fs::read_to_string(path)?
        };
        Self::from_json(&content)
    }

    /// Parse catalog from JSON string
    ///
    /// Records with malformed digests, and records reusing an ID already
    /// loaded, are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` if the JSON is not a valid catalog.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            warn!(
                expected = CATALOG_VERSION,
                found = %data.version,
                "Catalog version mismatch"
            );
        }

        let mut catalog = Self::new();
        for record in data.records {
            if catalog.contains(&record.id) {
                warn!(id = %record.id, "Duplicate archive ID in catalog, keeping the first record");
                continue;
            }
            match normalize_record(record) {
                Ok(record) => catalog.add_record(record),
                Err((id, field)) => {
                    warn!(id = %id, field, "Invalid digest in catalog record, skipping");
                }
            }
        }

        Ok(catalog)
    }

    /// Add a record to the catalog
    ///
    /// A record reusing an existing ID replaces the earlier one's ID mapping
    /// but both remain in the digest indexes; callers should check
    /// [`contains`](Self::contains) first.
    pub fn add_record(&mut self, record: CandidateRecord) {
        let index = self.records.len();
        let fp = &record.fingerprint;

        self.id_to_index.insert(record.id.clone(), index);

        if let Some(exact) = &fp.exact_digest {
            self.exact_to_record.entry(exact.clone()).or_insert(index);
        }

        self.signature_to_records
            .entry(fp.content_signature.clone())
            .or_default()
            .push(index);

        self.fast_hash_to_records
            .entry((fp.fast_hash.clone(), fp.file_size))
            .or_default()
            .push(index);

        if let Some(partial) = &fp.partial_digest {
            self.partial_to_records
                .entry(partial.clone())
                .or_default()
                .push(index);
        }

        self.records.push(record);
    }

    /// Get a record by ID
    #[must_use]
    pub fn get(&self, id: &ArchiveId) -> Option<&CandidateRecord> {
        self.id_to_index.get(id).map(|&idx| &self.records[idx])
    }

    #[must_use]
    pub fn contains(&self, id: &ArchiveId) -> bool {
        self.id_to_index.contains_key(id)
    }

    /// Export catalog to JSON
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            records: self.records.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Write the catalog as JSON, gzip-compressed when the name ends in `.gz`
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ReadError` on I/O failure.
    pub fn save_to_file(&self, path: &Path) -> Result<(), CatalogError> {
        let json = self.to_json()?;
        if is_gzip_path(path) {
            let mut encoder = GzEncoder::new(std::fs::File::create(path)?, Compression::default());
            encoder.write_all(json.as_bytes())?;
            encoder.finish()?;
        } else {
            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Number of records in catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn collect(&self, indices: Option<&Vec<usize>>) -> Vec<CandidateRecord> {
        indices
            .map(|idx| idx.iter().map(|&i| self.records[i].clone()).collect())
            .unwrap_or_default()
    }
}

impl CandidateStore for ArchiveCatalog {
    type Error = Infallible;

    fn find_by_exact_digest(&self, digest: &str) -> Result<Option<CandidateRecord>, Infallible> {
        Ok(self
            .exact_to_record
            .get(digest)
            .map(|&idx| self.records[idx].clone()))
    }

    fn find_by_content_signature(&self, signature: &str) -> Result<Vec<CandidateRecord>, Infallible> {
        Ok(self.collect(self.signature_to_records.get(signature)))
    }

    fn find_by_fast_hash_and_size(
        &self,
        fast_hash: &str,
        file_size: u64,
    ) -> Result<Vec<CandidateRecord>, Infallible> {
        Ok(self.collect(
            self.fast_hash_to_records
                .get(&(fast_hash.to_string(), file_size)),
        ))
    }

    fn find_by_partial_digest(&self, digest: &str) -> Result<Vec<CandidateRecord>, Infallible> {
        Ok(self.collect(self.partial_to_records.get(digest)))
    }
}

fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// Lowercase every digest, reporting the first field that is malformed
fn normalize_record(mut record: CandidateRecord) -> Result<CandidateRecord, (ArchiveId, &'static str)> {
    let fp = &mut record.fingerprint;

    let Some(signature) = normalize_digest(&fp.content_signature, CONTENT_SIGNATURE_HEX_LEN) else {
        return Err((record.id, "content_signature"));
    };
    fp.content_signature = signature;

    let Some(fast_hash) = normalize_digest(&fp.fast_hash, FAST_HASH_HEX_LEN) else {
        return Err((record.id, "fast_hash"));
    };
    fp.fast_hash = fast_hash;

    if let Some(exact) = fp.exact_digest.take() {
        let Some(exact) = normalize_digest(&exact, DIGEST_HEX_LEN) else {
            return Err((record.id, "exact_digest"));
        };
        fp.exact_digest = Some(exact);
    }

    if let Some(partial) = fp.partial_digest.take() {
        let Some(partial) = normalize_digest(&partial, DIGEST_HEX_LEN) else {
            return Err((record.id, "partial_digest"));
        };
        fp.partial_digest = Some(partial);
    }

    Ok(record)
}
