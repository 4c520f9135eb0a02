use serde::{Deserialize, Serialize};

use crate::core::fingerprint::Fingerprint;
use crate::core::types::ArchiveId;

/// A known archive as returned by a candidate store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Stable catalog identifier
    pub id: ArchiveId,

    /// Human-readable name of the mod
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Identity fields recorded for this archive
    #[serde(flatten)]
    pub fingerprint: Fingerprint,
}

impl CandidateRecord {
    pub fn new(id: impl Into<String>, fingerprint: Fingerprint) -> Self {
        Self {
            id: ArchiveId::new(id),
            display_name: None,
            fingerprint,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Name to show users, falling back to the identifier
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id.0)
    }
}
