//! Case-insensitive fuzzy similarity.

/// Normalized Levenshtein similarity of two strings, ignoring case.
///
/// Symmetric, bounded in [0, 1], and 1.0 only when both strings are equal
/// after lowercasing.
pub fn similarity(a: &str, b: &str) -> f32 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    strsim::normalized_levenshtein(&a, &b) as f32
}
