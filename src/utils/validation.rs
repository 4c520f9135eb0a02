//! Centralized validation and helper functions.

/// Maximum number of entries allowed in a single container (DOS protection)
pub const MAX_ENTRIES: usize = 1_000_000;

/// Hex length of an MD5 content signature
pub const CONTENT_SIGNATURE_HEX_LEN: usize = 32;

/// Hex length of a SHA-256 exact digest or BLAKE3 partial digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Hex length of a 64-bit fast hash
pub const FAST_HASH_HEX_LEN: usize = 16;

/// Validate that a string is a hex digest of the given length.
///
/// # Examples
///
/// ```
/// use vpk_solver::utils::validation::is_valid_hex_digest;
///
/// assert!(is_valid_hex_digest("6aef897c3d6ff0c78aff06ac189178dd", 32));
/// assert!(!is_valid_hex_digest("not-a-digest", 12));
/// assert!(!is_valid_hex_digest("6aef897c3d6ff0c78aff06ac189178d", 32)); // 31 chars
/// ```
#[must_use]
pub fn is_valid_hex_digest(s: &str, len: usize) -> bool {
    s.len() == len && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Normalize a hex digest to lowercase.
/// Returns None if the input is not a valid digest of the given length.
#[must_use]
pub fn normalize_digest(s: &str, len: usize) -> Option<String> {
    if is_valid_hex_digest(s, len) {
        Some(s.to_lowercase())
    } else {
        None
    }
}

/// Check if adding another entry would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new entry.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if let Some(msg) = check_entry_limit(entries.len()) {
///     return Err(ParseError::MalformedContainer(msg));
/// }
/// entries.push(new_entry); // Safe to add
/// ```
#[must_use]
pub fn check_entry_limit(count: usize) -> Option<String> {
    if count >= MAX_ENTRIES {
        Some(format!(
            "Too many entries: adding another would exceed maximum of {MAX_ENTRIES}"
        ))
    } else {
        None
    }
}
