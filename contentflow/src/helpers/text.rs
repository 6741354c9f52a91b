//! Character-budget helpers.

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Keeps the first `budget` characters of `text`, appending [`ELLIPSIS`] when
/// anything was cut. Counts chars, not bytes.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Returns `value` trimmed, or `fallback` when it is blank.
#[must_use]
pub fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}
