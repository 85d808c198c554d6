//! Shared regexes and constants for the text pipeline.
//!
//! The normalizer and the extractor must agree on what a block separator and a
//! login-shaped token look like, so both read them from here.

use regex::{Regex, RegexSet};
use std::sync::LazyLock;

/// Synthetic "N days ago" line standing in for the time-ago line that every
/// notification ends with. The `○` is a literal glyph, never a number.
pub const PLACEHOLDER_LINE: &str = "○日前";

/// Whitespace as pasted browser text sees it: Unicode `White_Space` plus the
/// U+FEFF byte-order mark, minus U+0085 (NEL).
pub const SPACE_CLASS: &str = r"[\s\x{FEFF}--\x{85}]";

/// One or more blank lines between blocks.
pub static BLOCK_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\n{SPACE_CLASS}*\n")).expect("block separator regex")
});

/// A login-shaped run anywhere in a line.
pub static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9_]{4,25}").expect("token regex"));

/// A whole string that is exactly one login.
pub static TOKEN_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]{4,25}$").expect("exact token regex"));

/// A login wrapped in parentheses, e.g. `表示名 (login_name)`.
pub static PAREN_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([a-zA-Z0-9_]{4,25}\)").expect("paren token regex"));

/// The first parenthesised group of any content.
pub static PAREN_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)").expect("paren group regex"));

pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("{SPACE_CLASS}+")).expect("whitespace regex"));

/// Char-level twin of [`SPACE_CLASS`].
pub fn is_space(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

/// `str::trim` with [`is_space`] as the whitespace test.
pub fn trim_space(s: &str) -> &str {
    s.trim_matches(is_space)
}

// ---------------------------------------------------------------------------
// Denylist
// ---------------------------------------------------------------------------

/// Notification boilerplate stripped from a line before the final token pick.
///
/// Order matters: every pass matches the whole list as one alternation, so at
/// a given position an earlier entry wins over a later one (`prime gaming`
/// must come before `prime`).
pub const DENYLIST: &[(&str, &str)] = &[
    ("subscriber", r"subscriber\s*[0-9]*"),
    ("subscriber-ja", r"サブスクライバー"),
    ("watching-muted", r"音声なしで視聴中"),
    ("audio-only", r"音声のみ"),
    ("verified", r"認証済み"),
    ("season-2", r"シーズン2"),
    ("badge-gamerduo", r"GamerDuo"),
    ("badge-wylder", r"Wylder"),
    ("badge-legendus", r"LEGENDUS"),
    ("badge-glhf-pledge", r"GLHF\s*Pledge"),
    ("badge-raid-race", r"Raid\s*Race"),
    ("badge-raging-wolf-helm", r"Raging\s*Wolf\s*Helm"),
    ("badge-turbo", r"Turbo"),
    ("badge-ugly-sweater", r"Ugly\s*Sweater"),
    ("prime-gaming", r"prime\s*gaming"),
    ("prime", r"prime"),
    ("gaming", r"gaming"),
    ("vip", r"vip"),
    ("cheer", r"cheer\s*[0-9]{1,3}(?:,[0-9]{3})*"),
    ("bits-leader", r"ビッツリーダー\s*[0-9]*"),
    ("subtember", r"subtember\s*[0-9]{4}"),
    ("twitch-recap", r"twitch\s*recap\s*[0-9]{4}"),
    ("tenure", r"[0-9]+(?:\.[0-9]+)?\s*[- ]?\s*(?:year|month)s?"),
    ("tenure-ja", r"[0-9]+\s*ヶ?月"),
    ("year", r"20[0-9]{2}"),
];

/// One denylist entry ready to compile, with `\s` widened to [`SPACE_CLASS`].
///
/// ASCII entries fold case over ASCII only, so `ſ` never matches `s` and the
/// Kelvin sign never matches `k`.
fn denylist_pattern(pattern: &str) -> String {
    if pattern.is_ascii() {
        let space = format!("(?u:{SPACE_CLASS})");
        format!("(?i-u:{})", pattern.replace(r"\s", &space))
    } else {
        format!("(?i:{})", pattern.replace(r"\s", SPACE_CLASS))
    }
}

/// [`DENYLIST`] compiled into a single case-insensitive ordered alternation.
pub static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = DENYLIST
        .iter()
        .map(|(_, pattern)| denylist_pattern(pattern))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).expect("denylist regex")
});

/// The same entries as a set, for reporting which labels fired on a line.
pub static NOISE_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(DENYLIST.iter().map(|(_, pattern)| denylist_pattern(pattern)))
        .expect("denylist regex set")
});

/// Split `text` into its non-blank blocks, in document order.
pub fn blocks(text: &str) -> impl Iterator<Item = &str> {
    BLOCK_SEPARATOR
        .split(text)
        .filter(|block| !trim_space(block).is_empty())
}

/// Trimmed, non-empty lines of a block.
pub fn content_lines(block: &str) -> Vec<&str> {
    block
        .split('\n')
        .map(trim_space)
        .filter(|line| !line.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
