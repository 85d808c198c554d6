//! Summary: per-login tallies, the search filter over them, and the small
//! helpers renderers share (display labels, caret → hit lookup).

use crate::search::{fold_for_search, matches_folded};
use crate::types::ExtractionHit;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// How many times one login appeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub name: String,
    pub count: usize,
}

/// Anything that can answer "what display name does this login have, if we
/// already know it?" without blocking.
pub trait DisplayNameSource {
    fn display_name(&self, login: &str) -> Option<String>;
}

impl DisplayNameSource for HashMap<String, String> {
    fn display_name(&self, login: &str) -> Option<String> {
        self.get(login).cloned()
    }
}

/// Count hits per login; most frequent first, ties in collation order.
pub fn tally(hits: &[ExtractionHit]) -> Vec<SummaryRow> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for hit in hits {
        *counts.entry(hit.name.as_str()).or_default() += 1;
    }
    let mut rows: Vec<SummaryRow> = counts
        .into_iter()
        .map(|(name, count)| SummaryRow { name: name.to_string(), count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| collate(&a.name, &b.name)));
    rows
}

/// Keep rows whose login (or known display name, when `names` is given)
/// contains `query` after folding. A blank query keeps everything.
pub fn filter_rows(
    rows: &[SummaryRow],
    query: &str,
    names: Option<&dyn DisplayNameSource>,
) -> Vec<SummaryRow> {
    let folded = fold_for_search(query.trim());
    if folded.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|row| {
            if matches_folded(&row.name, &folded) {
                return true;
            }
            names
                .and_then(|source| source.display_name(&row.name))
                .is_some_and(|display| matches_folded(&display, &folded))
        })
        .cloned()
        .collect()
}

/// `login（Display）` when a display name is known and differs from the login,
/// plain `login` otherwise.
pub fn display_label(login: &str, display: Option<&str>) -> String {
    match display {
        Some(d) if !d.is_empty() && d != login => format!("{login}（{d}）"),
        _ => login.to_string(),
    }
}

/// Position in `hits` of the last hit starting at or before `offset`.
///
/// `hits` must be in document order, as the extractor returns them.
pub fn hit_at_or_before(hits: &[ExtractionHit], offset: usize) -> Option<usize> {
    hits.partition_point(|h| h.index <= offset).checked_sub(1)
}

// ---------------------------------------------------------------------------
// Collation
// ---------------------------------------------------------------------------

/// English collation for login-shaped strings: `_` sorts before digits,
/// digits before letters, letters case-insensitively with lowercase first on
/// an otherwise equal string.
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .map(collation_key)
        .cmp(b.chars().map(collation_key));
    primary.then_with(|| {
        // Tertiary: lowercase before uppercase at the first differing char.
        a.chars()
            .map(|c| !c.is_lowercase())
            .cmp(b.chars().map(|c| !c.is_lowercase()))
    })
}

fn collation_key(c: char) -> (u8, char) {
    let class = match c {
        '_' => 0,
        c if c.is_ascii_digit() => 1,
        c if c.is_alphabetic() => 2,
        _ => 3,
    };
    (class, c.to_ascii_lowercase())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
