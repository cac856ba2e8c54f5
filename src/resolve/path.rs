//! Dotted key handling.
//!
//! Keys are lowercased before they touch any source, and `.` is the only
//! hierarchy delimiter. A literal `.` inside a user key cannot be told apart
//! from a separator.

/// Hierarchy delimiter for dotted keys.
pub const KEY_DELIMITER: &str = ".";

/// Case-normalize a key for storage and lookup.
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

/// Split a dotted key into its path segments.
///
/// An empty key yields a single empty segment, mirroring `str::split`.
pub fn split_key(key: &str) -> Vec<String> {
    key.split(KEY_DELIMITER).map(str::to_string).collect()
}

/// Join path segments back into a dotted key.
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(KEY_DELIMITER)
}
