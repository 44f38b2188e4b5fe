//! Query pre-processing

/// Queries shorter than this (after sanitizing) are not searched
pub const MIN_QUERY_LEN: usize = 2;

/// Strip punctuation and emoji, collapse whitespace runs, trim.
///
/// Word characters (letters, digits, `_`) and whitespace survive.
///
/// ```
/// use tunebar_suggest::sanitize_query;
///
/// assert_eq!(sanitize_query("  shape   of you!! 🎵 "), "shape of you");
/// ```
pub fn sanitize_query(query: &str) -> String {
    let kept: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check if a sanitized query is long enough to search
pub fn is_searchable(sanitized: &str) -> bool {
    sanitized.chars().count() >= MIN_QUERY_LEN
}
