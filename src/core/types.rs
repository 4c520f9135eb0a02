use serde::{Deserialize, Serialize};

/// Unique identifier for an archive in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchiveId(pub String);

impl ArchiveId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for ArchiveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which identification tier produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchType {
    /// Byte-for-byte identical archive
    Exact,
    /// Same set of files, possibly packed in a different order
    ContentSignature,
    /// Same structural summary and file size
    FastHash,
    /// Shares file contents but differs in names or layout
    PartialSimilarity,
}

impl MatchType {
    /// Fixed certainty attached to each tier
    #[must_use]
    pub fn certainty(self) -> u8 {
        match self {
            Self::Exact => 100,
            Self::ContentSignature => 90,
            Self::FastHash => 70,
            Self::PartialSimilarity => 40,
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::ContentSignature => write!(f, "content-signature"),
            Self::FastHash => write!(f, "fast-hash"),
            Self::PartialSimilarity => write!(f, "partial-similarity"),
        }
    }
}
