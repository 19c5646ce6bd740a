//! Utilities for sanitizing error messages taken from remote responses.
//!
//! Remote services can return arbitrary bodies; these are stripped of control
//! characters and truncated before they end up in logs or error callbacks.

use crate::config::MAX_ERROR_MESSAGE_LENGTH;

/// Sanitizes an error message by removing control characters.
///
/// Control characters (0x00-0x1F, except newline/tab/carriage return) are
/// removed; everything else, including non-ASCII text, is kept.
pub fn sanitize_error_message(message: &str) -> String {
    message
        .chars()
        .filter(|c| {
            let code = *c as u32;
            code >= 0x20 // Printable ASCII starts at 0x20 (space)
                || code == 0x09 // Tab
                || code == 0x0A // Newline
                || code == 0x0D // Carriage return
        })
        .filter(|c| *c != '\u{7F}')
        .collect()
}

/// Sanitizes and truncates an error message to `MAX_ERROR_MESSAGE_LENGTH` characters.
///
/// Truncation counts characters, not bytes, so multi-byte text is never split.
pub fn sanitize_and_truncate_error_message(message: &str) -> String {
    let sanitized = sanitize_error_message(message);
    let char_count = sanitized.chars().count();

    if char_count > MAX_ERROR_MESSAGE_LENGTH {
        // Leave room for the truncation note
        let keep = MAX_ERROR_MESSAGE_LENGTH.saturating_sub(50);
        let truncated: String = sanitized.chars().take(keep).collect();
        format!(
            "{}... (truncated, original length: {} chars)",
            truncated, char_count
        )
    } else {
        sanitized
    }
}
