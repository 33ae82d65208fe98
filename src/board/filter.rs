//! Input validation and content filtering
//!
//! Text is trimmed first; lengths are counted in characters. Links,
//! messenger handles and `@`-mentions are blocked everywhere.

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::BoardError;

static BLOCKED_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://|t\.me/|@\w+)").expect("blocked-link pattern is valid")
});

/// Whether `text` contains a link, messenger handle or mention
pub fn has_blocked_link(text: &str) -> bool {
    BLOCKED_LINK.is_match(text)
}

/// Trim and validate a user-supplied text field
///
/// Returns the trimmed text on success.
pub fn clean_text(field: &str, text: &str, max_len: usize) -> Result<String, BoardError> {
    let text = text.trim();

    if text.is_empty() {
        return Err(BoardError::validation(format!("{} is required", field)));
    }
    if text.chars().count() > max_len {
        return Err(BoardError::validation(format!(
            "{} is longer than {} characters",
            field, max_len
        )));
    }
    if has_blocked_link(text) {
        return Err(BoardError::validation("Links are not allowed"));
    }

    Ok(text.to_string())
}

/// Validate an opaque session token (presence only)
pub fn check_session(session_id: &str) -> Result<(), BoardError> {
    if session_id.trim().is_empty() {
        return Err(BoardError::validation("Session id is required"));
    }
    Ok(())
}
