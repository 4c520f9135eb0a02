use crate::core::entry::Entry;

/// Compute the order-insensitive content signature of a set of entries.
///
/// The signature is computed by:
/// 1. Rendering each entry as `path:crc:size` (CRC as 8 lowercase hex digits)
/// 2. Sorting the lines
/// 3. Joining them with newlines
/// 4. Computing MD5 of the concatenated string
///
/// An empty container hashes the empty string, so the signature is always present.
#[must_use]
pub fn compute_content_signature(entries: &[Entry]) -> String {
    let mut lines: Vec<String> = entries
        .iter()
        .map(|e| format!("{}:{:08x}:{}", e.path(), e.crc32, e.file_size()))
        .collect();
    lines.sort_unstable();
    let concatenated = lines.join("\n");
    let digest = md5::compute(concatenated.as_bytes());
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::EMBEDDED_ARCHIVE_INDEX;

    fn entry(name: &str, crc32: u32, entry_length: u32) -> Entry {
        Entry {
            extension: "vmt".to_string(),
            directory: "materials".to_string(),
            name: name.to_string(),
            crc32,
            archive_index: EMBEDDED_ARCHIVE_INDEX,
            entry_offset: 0,
            entry_length,
            preload: Vec::new(),
        }
    }

    #[test]
    fn test_empty_signature_is_md5_of_nothing() {
        assert_eq!(
            compute_content_signature(&[]),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_signature_ignores_order() {
        let a = vec![entry("a", 1, 10), entry("b", 2, 20), entry("c", 3, 30)];
        let b = vec![entry("c", 3, 30), entry("a", 1, 10), entry("b", 2, 20)];
        assert_eq!(compute_content_signature(&a), compute_content_signature(&b));
    }

    #[test]
    fn test_signature_sees_crc_change() {
        let a = vec![entry("a", 1, 10)];
        let b = vec![entry("a", 2, 10)];
        assert_ne!(compute_content_signature(&a), compute_content_signature(&b));
    }

    #[test]
    fn test_signature_ignores_storage_location() {
        let a = vec![entry("a", 1, 10)];
        let mut moved = entry("a", 1, 10);
        moved.archive_index = 4;
        moved.entry_offset = 9000;
        assert_eq!(compute_content_signature(&a), compute_content_signature(&[moved]));
    }
}
