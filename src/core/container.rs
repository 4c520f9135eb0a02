use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::entry::Entry;
use crate::core::header::ContainerHeader;
use crate::parsing::vpk::ParseError;

/// A parsed container: header plus directory tree entries in on-disk order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedContainer {
    /// Source file path (if parsed from disk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub header: ContainerHeader,

    /// Entries in the order they appear in the tree
    pub entries: Vec<Entry>,

    /// Bytes actually consumed while walking the tree
    pub tree_length: usize,
}

impl ParsedContainer {
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of the full sizes of every entry
    #[must_use]
    pub fn total_content_size(&self) -> u64 {
        self.entries.iter().map(Entry::file_size).sum()
    }

    /// Distinct chunk ids referenced by entries stored outside the directory file
    #[must_use]
    pub fn chunk_ids(&self) -> BTreeSet<u16> {
        self.entries
            .iter()
            .filter(|e| !e.is_embedded())
            .map(|e| e.archive_index)
            .collect()
    }

    /// Whether content is spread over more than one physical chunk.
    ///
    /// True when at least one entry lives outside the directory file and
    /// more than one distinct archive index (the embedded sentinel included)
    /// appears in the tree.
    #[must_use]
    pub fn has_multiple_chunks(&self) -> bool {
        let any_external = self.entries.iter().any(|e| !e.is_embedded());
        if !any_external {
            return false;
        }
        let distinct: BTreeSet<u16> = self.entries.iter().map(|e| e.archive_index).collect();
        distinct.len() > 1
    }

    /// Whether any entry carries preload bytes inside the tree
    #[must_use]
    pub fn has_inline_data(&self) -> bool {
        self.entries.iter().any(Entry::has_preload)
    }

    /// Payload bytes of an entry stored in the directory file.
    ///
    /// Returns `Ok(None)` for entries that live in an external chunk.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MalformedContainer` if the payload range lies
    /// outside `raw`.
    pub fn embedded_payload<'a>(
        &self,
        raw: &'a [u8],
        entry: &Entry,
    ) -> Result<Option<&'a [u8]>, ParseError> {
        if !entry.is_embedded() {
            return Ok(None);
        }
        let out_of_range = || {
            ParseError::MalformedContainer(format!(
                "payload of '{}' at offset {} ({} bytes) lies outside the {}-byte input",
                entry.path(),
                entry.entry_offset,
                entry.entry_length,
                raw.len()
            ))
        };
        let start = self
            .header
            .data_offset()
            .checked_add(entry.entry_offset as usize)
            .ok_or_else(out_of_range)?;
        let end = start
            .checked_add(entry.entry_length as usize)
            .ok_or_else(out_of_range)?;
        raw.get(start..end).map(Some).ok_or_else(out_of_range)
    }

    /// Full contents (preload followed by payload) of an entry stored in the directory file.
    ///
    /// Returns `Ok(None)` for entries whose payload lives in an external chunk.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MalformedContainer` if the payload range lies
    /// outside `raw`.
    pub fn entry_contents(&self, raw: &[u8], entry: &Entry) -> Result<Option<Vec<u8>>, ParseError> {
        let Some(payload) = self.embedded_payload(raw, entry)? else {
            return Ok(None);
        };
        let mut contents = Vec::with_capacity(entry.preload.len() + payload.len());
        contents.extend_from_slice(&entry.preload);
        contents.extend_from_slice(payload);
        Ok(Some(contents))
    }

    /// Check the stored CRC-32 of an in-file entry against its contents.
    ///
    /// Returns `Ok(None)` when the contents are not available in `raw`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MalformedContainer` if the payload range lies
    /// outside `raw`.
    pub fn verify_entry_crc(&self, raw: &[u8], entry: &Entry) -> Result<Option<bool>, ParseError> {
        Ok(self
            .entry_contents(raw, entry)?
            .map(|contents| crc32fast::hash(&contents) == entry.crc32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::EMBEDDED_ARCHIVE_INDEX;

    fn entry(archive_index: u16, preload: &[u8]) -> Entry {
        Entry {
            extension: "txt".to_string(),
            directory: " ".to_string(),
            name: format!("f{archive_index}"),
            crc32: 0,
            archive_index,
            entry_offset: 0,
            entry_length: 4,
            preload: preload.to_vec(),
        }
    }

    fn container(entries: Vec<Entry>) -> ParsedContainer {
        ParsedContainer {
            source: None,
            header: ContainerHeader::v1(0),
            entries,
            tree_length: 0,
        }
    }

    #[test]
    fn test_all_embedded_is_single_chunk() {
        let c = container(vec![
            entry(EMBEDDED_ARCHIVE_INDEX, b""),
            entry(EMBEDDED_ARCHIVE_INDEX, b""),
        ]);
        assert!(!c.has_multiple_chunks());
        assert!(c.chunk_ids().is_empty());
    }

    #[test]
    fn test_single_external_chunk_is_not_multiple() {
        let c = container(vec![entry(0, b""), entry(0, b"")]);
        assert!(!c.has_multiple_chunks());
        assert_eq!(c.chunk_ids().into_iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_external_and_embedded_is_multiple() {
        let c = container(vec![entry(0, b""), entry(EMBEDDED_ARCHIVE_INDEX, b"")]);
        assert!(c.has_multiple_chunks());
    }

    #[test]
    fn test_two_external_chunks_is_multiple() {
        let c = container(vec![entry(0, b""), entry(1, b"")]);
        assert!(c.has_multiple_chunks());
    }

    #[test]
    fn test_inline_data_flag() {
        assert!(!container(vec![entry(0, b"")]).has_inline_data());
        assert!(container(vec![entry(0, b"x")]).has_inline_data());
    }

    #[test]
    fn test_external_entry_has_no_embedded_payload() {
        let c = container(vec![entry(3, b"")]);
        assert_eq!(c.embedded_payload(&[0; 64], &c.entries[0]).unwrap(), None);
    }

    #[test]
    fn test_embedded_payload_out_of_range() {
        let c = container(vec![entry(EMBEDDED_ARCHIVE_INDEX, b"")]);
        let err = c.embedded_payload(&[0; 13], &c.entries[0]).unwrap_err();
        assert!(matches!(err, ParseError::MalformedContainer(_)));
    }

    #[test]
    fn test_embedded_payload_extreme_fields() {
        let mut e = entry(EMBEDDED_ARCHIVE_INDEX, b"");
        e.entry_offset = u32::MAX;
        e.entry_length = u32::MAX;
        let mut c = container(vec![e]);
        c.header = ContainerHeader::v2(u32::MAX, u32::MAX);
        let err = c.embedded_payload(&[0; 64], &c.entries[0]).unwrap_err();
        assert!(matches!(err, ParseError::MalformedContainer(ref msg) if msg.contains("outside")));
    }

    #[test]
    fn test_entry_contents_and_crc() {
        let mut raw = ContainerHeader::v1(0).to_bytes();
        raw.extend_from_slice(b"body");
        let mut e = entry(EMBEDDED_ARCHIVE_INDEX, b"pre-");
        e.crc32 = crc32fast::hash(b"pre-body");
        let c = container(vec![e]);

        let contents = c.entry_contents(&raw, &c.entries[0]).unwrap().unwrap();
        assert_eq!(contents, b"pre-body");
        assert_eq!(c.verify_entry_crc(&raw, &c.entries[0]).unwrap(), Some(true));
        assert_eq!(c.total_content_size(), 8);
    }
}
