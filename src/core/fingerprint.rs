use serde::{Deserialize, Serialize};

/// Identity digests derived from a parsed container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// SHA-256 of the raw bytes (only when requested)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_digest: Option<String>,

    /// Order-insensitive digest of the sorted (path, CRC, size) triples
    pub content_signature: String,

    /// Order-sensitive structural hash, paired with `file_size`
    pub fast_hash: String,

    /// Total byte size of the raw input
    pub file_size: u64,

    pub entry_count: usize,

    pub format_version: u32,

    pub has_multiple_chunks: bool,

    pub has_inline_data: bool,

    /// Block-tree root over entry contents (only when requested)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_digest: Option<String>,
}

impl Fingerprint {
    /// Absolute difference between this fingerprint's entry count and another
    #[must_use]
    pub fn entry_count_difference(&self, other: &Self) -> usize {
        self.entry_count.abs_diff(other.entry_count)
    }
}
