//! Search layer: folds strings into comparison keys for substring search.
//!
//! Both the query and the candidate (login or display name) go through
//! [`fold_for_search`] so that width, case, and katakana/hiragana differences
//! do not prevent a match.

use unicode_normalization::UnicodeNormalization;

const KATAKANA_FIRST: char = '\u{30A1}';
const KATAKANA_LAST: char = '\u{30F6}';
const KANA_OFFSET: u32 = 0x60;

/// NFKC-normalize, lowercase, and fold katakana (ァ..ヶ) onto hiragana.
///
/// NFKC already widens halfwidth katakana, so `ｱｲｳ`, `アイウ` and `あいう`
/// all fold to the same key.
pub fn fold_for_search(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    value
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .map(fold_kana)
        .collect()
}

fn fold_kana(c: char) -> char {
    if (KATAKANA_FIRST..=KATAKANA_LAST).contains(&c) {
        char::from_u32(c as u32 - KANA_OFFSET).unwrap_or(c)
    } else {
        c
    }
}

/// True when folded `candidate` contains the already-folded `folded_query`.
/// An empty query matches everything.
pub fn matches_folded(candidate: &str, folded_query: &str) -> bool {
    folded_query.is_empty() || fold_for_search(candidate).contains(folded_query)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_folds_to_empty() {
        assert_eq!(fold_for_search(""), "");
    }

    #[test]
    fn ascii_is_lowercased() {
        assert_eq!(fold_for_search("SomeHandle_123"), "somehandle_123");
    }

    #[test]
    fn fullwidth_ascii_is_narrowed() {
        assert_eq!(fold_for_search("ＡＢＣ１２３"), "abc123");
    }

    #[test]
    fn katakana_folds_to_hiragana() {
        assert_eq!(fold_for_search("カタカナ"), "かたかな");
        assert_eq!(fold_for_search("ｶﾀｶﾅ"), "かたかな");
    }

    #[test]
    fn long_vowel_mark_is_outside_the_fold_range() {
        assert_eq!(fold_for_search("ー"), "ー");
    }

    #[test]
    fn matches_folded_is_width_and_kana_insensitive() {
        let query = fold_for_search("ﾕｰｻﾞｰ");
        assert!(matches_folded("ゆーざー", &query));
        assert!(matches_folded("ユーザー名", &query));
        assert!(!matches_folded("someone", &query));
        assert!(matches_folded("anything", ""));
    }
}
