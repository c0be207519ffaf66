//! String helpers for rendering organisation fields.

/// Remove a leading `http://` or `https://` from a URL.
///
/// Bare domains are returned unchanged.
pub fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Shorten a display string to `max_chars` characters, appending `...`
/// when anything was cut.
///
/// Counts characters rather than bytes so multibyte names never split.
pub fn shorten(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((end, _)) => format!("{}...", &s[..end]),
    }
}
