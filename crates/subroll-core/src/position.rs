//! Offset ↔ line-number conversion.
//!
//! Offsets are UTF-8 byte offsets into the exact text that was scanned; line
//! numbers are 1-based and count `\n` only.

/// 1-based line number containing byte `offset` of `text`.
///
/// Offsets past the end are clamped to the end of the text.
pub fn line_number_at(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Byte offset where 1-based `line` starts, or `None` if the text has fewer
/// lines. Line 0 is treated as line 1.
pub fn line_start(text: &str, line: usize) -> Option<usize> {
    if line <= 1 {
        return Some(0);
    }
    text.match_indices('\n')
        .nth(line - 2)
        .map(|(at, _)| at + 1)
}

/// Number of lines in `text` as an editor would show them (a trailing `\n`
/// opens one more, empty, line).
pub fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
