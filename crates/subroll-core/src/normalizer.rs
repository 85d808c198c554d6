//! Normalizer: repairs a half-pasted trailing block before extraction.
//!
//! Pasting one notification at a time usually leaves the last block holding
//! only the login, with the "N days ago" line still on the clipboard. The
//! normalizer completes such a block with [`PLACEHOLDER_LINE`] and makes sure
//! the text ends in a blank line so the extractor sees the last block as
//! closed.

use crate::patterns::{blocks, content_lines, PLACEHOLDER_LINE, TOKEN};

/// Normalize raw pasted text.
///
/// Line endings are unified to `\n`. A trailing block made of exactly one
/// token-bearing line gets the placeholder time-ago line appended. The result
/// always ends with at least two newlines, except for empty input which stays
/// empty.
pub fn normalize(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n");
    if text.is_empty() {
        return String::new();
    }

    let base_len = text.trim_end_matches('\n').len();
    let (base, trailing_newlines) = text.split_at(base_len);
    let mut base = base.to_string();

    if needs_placeholder(&base) {
        tracing::trace!(base_len, "normalizer: completing trailing block");
        base.push('\n');
        base.push_str(PLACEHOLDER_LINE);
    }

    let mut result = base;
    result.push_str(trailing_newlines);

    if !result.ends_with("\n\n") {
        if result.ends_with('\n') {
            result.push('\n');
        } else {
            result.push_str("\n\n");
        }
    }

    result
}

/// True when the last block of `base` is a lone login-looking line.
fn needs_placeholder(base: &str) -> bool {
    if base.is_empty() {
        return false;
    }
    let last_block = blocks(base).last().unwrap_or("");
    let lines = content_lines(last_block);
    lines.len() == 1 && TOKEN.is_match(lines[0])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
