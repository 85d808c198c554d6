//! Extractor: turns pasted notification text into logins.
//!
//! The text is split into blank-line-delimited blocks. Each block goes through
//! a fixed pipeline with two early exits:
//!
//! ```text
//! lines ──► pick target line ──► (login) in parens? ──yes──► hit
//!   │                                   │ no
//!   └─ none ──► EmptyBlock              ▼
//!                               strip denylist noise ──► last token ──► hit
//!                                                           │ none
//!                                                           ▼
//!                                                    NoRecoverableToken
//! ```
//!
//! A failing block never affects the blocks after it.

use crate::patterns::{
    blocks, content_lines, DENYLIST, NOISE, NOISE_SET, PAREN_GROUP, PAREN_TOKEN,
    trim_space, PLACEHOLDER_LINE, TOKEN, TOKEN_EXACT, WHITESPACE_RUN,
};
use crate::position::line_number_at;
use crate::types::{BlockErrorKind, ExtractionError, ExtractionHit, ExtractionResult};

/// Extract one login (or one error) per non-blank block of `text`.
pub fn extract(text: &str) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let mut search_from = 0usize;

    for block in blocks(text) {
        // Blocks come out of `text` in order, so a forward search from the end
        // of the previous block always lands on this block's own position.
        let index = text[search_from..]
            .find(block)
            .map_or(search_from, |at| search_from + at);
        search_from = index + block.len();

        match resolve_block(block) {
            Ok(name) => {
                tracing::trace!(index, name = %name, "extractor: hit");
                result.hits.push(ExtractionHit { name, index });
            }
            Err(kind) => {
                let line = line_number_at(text, index);
                tracing::trace!(index, line, ?kind, "extractor: unparseable block");
                result.errors.push(ExtractionError { line, index, kind });
            }
        }
    }

    tracing::debug!(
        hits = result.hits.len(),
        errors = result.errors.len(),
        "extractor: pass complete"
    );
    result
}

/// Run the per-block heuristic on a single block of text.
pub fn resolve_block(block: &str) -> Result<String, BlockErrorKind> {
    let lines = with_placeholder(content_lines(block));
    let target = pick_target_line(&lines).ok_or(BlockErrorKind::EmptyBlock)?;

    if let Some(name) = paren_login(target) {
        return Ok(name.to_string());
    }

    let cleaned = strip_noise(target);
    TOKEN
        .find_iter(&cleaned)
        .last()
        .map(|m| m.as_str().to_string())
        .ok_or(BlockErrorKind::NoRecoverableToken)
}

/// Keep the first two lines; a lone line gets the placeholder as its second.
fn with_placeholder(mut lines: Vec<&str>) -> Vec<&str> {
    lines.truncate(2);
    if lines.len() == 1 {
        lines.push(PLACEHOLDER_LINE);
    }
    lines
}

/// Parenthesised login first, then any token-bearing line, then line one.
fn pick_target_line<'a>(lines: &[&'a str]) -> Option<&'a str> {
    lines
        .iter()
        .find(|line| PAREN_TOKEN.is_match(line))
        .or_else(|| lines.iter().find(|line| TOKEN.is_match(line)))
        .or_else(|| lines.first())
        .copied()
}

/// The inside of the first `(...)` group, if it is exactly one login.
fn paren_login(line: &str) -> Option<&str> {
    let inner = PAREN_GROUP.captures(line)?.get(1)?.as_str();
    TOKEN_EXACT.is_match(inner).then_some(inner)
}

/// Remove denylist noise until a pass changes nothing, then squeeze
/// whitespace.
///
/// A single pass is not enough: removing one entry can glue its neighbours
/// into a new match (`2prime024` loses `prime` and exposes the year `2024`).
pub fn strip_noise(line: &str) -> String {
    let mut cleaned = line.to_string();
    loop {
        let next = NOISE.replace_all(&cleaned, "").into_owned();
        if next == cleaned {
            break;
        }
        cleaned = next;
    }
    trim_space(&WHITESPACE_RUN.replace_all(&cleaned, " ")).to_string()
}

/// Labels of every denylist entry that matches somewhere in `line`, in
/// denylist order.
pub fn explain_noise(line: &str) -> Vec<&'static str> {
    NOISE_SET
        .matches(line)
        .into_iter()
        .map(|i| DENYLIST[i].0)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
