use crate::core::entry::Entry;

/// Serialize the structural summary hashed by [`compute_fast_hash`].
///
/// Layout (fixed; changing it invalidates every stored fast hash):
/// entry count as u64 LE, then for each entry in parse order its logical
/// path bytes, a NUL byte, the CRC-32 as u32 LE and the full file size as
/// u64 LE.
#[must_use]
pub fn fast_hash_input(entries: &[Entry]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + entries.len() * 48);
    buf.extend_from_slice(&(entries.len() as u64).to_le_bytes());
    for entry in entries {
        buf.extend_from_slice(entry.path().as_bytes());
        buf.push(0);
        buf.extend_from_slice(&entry.crc32.to_le_bytes());
        buf.extend_from_slice(&entry.file_size().to_le_bytes());
    }
    buf
}

/// Order-sensitive, non-cryptographic hash of the entry summary as 16 hex digits
#[must_use]
pub fn compute_fast_hash(entries: &[Entry]) -> String {
    format!("{:016x}", seahash::hash(&fast_hash_input(entries)))
}
