//! Shared helpers and error types for SearchPlus.

use thiserror::Error;

/// Result type for shared helpers.
pub type UtilsResult<T> = Result<T, UtilsError>;

/// Shared error variants for cross-crate helpers.
#[derive(Debug, Error)]
pub enum UtilsError {
    /// A parsing error occurred.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Split text into lower-cased, whitespace-delimited, non-empty tokens.
pub fn lowercase_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_lowercase)
}

/// Case-insensitive substring test. `needle` must already be lower-cased.
pub fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Split a `key=value` assignment into trimmed parts.
///
/// The key must be non-empty; the value may be empty (e.g. clearing a text field).
pub fn split_assignment(input: &str) -> UtilsResult<(&str, &str)> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| UtilsError::Parse(format!("expected KEY=VALUE, got `{input}`")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(UtilsError::Parse(format!("missing key in `{input}`")));
    }
    Ok((key, value.trim()))
}
