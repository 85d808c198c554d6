//! Domain-specific assertion macros for subroll harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that say which
//! block went wrong and what the extractor saw there.

use subroll_core::{patterns, ExtractionResult};

/// Assert the logins of an `ExtractionResult`, in document order.
///
/// ```rust
/// assert_hits!(result, ["user_one", "abcd1234"]);
/// ```
#[macro_export]
macro_rules! assert_hits {
    ($result:expr, [$($name:expr),* $(,)?]) => {{
        let result: &subroll_core::ExtractionResult = &$result;
        let actual: Vec<&str> = result.hits.iter().map(|h| h.name.as_str()).collect();
        let expected: Vec<&str> = vec![$($name),*];
        pretty_assertions::assert_eq!(actual, expected, "assert_hits! failed\n  errors: {:?}", result.errors);
    }};
}

/// Assert the 1-based lines of the unparseable blocks.
///
/// ```rust
/// assert_error_lines!(result, [4, 10]);
/// ```
#[macro_export]
macro_rules! assert_error_lines {
    ($result:expr, [$($line:expr),* $(,)?]) => {{
        let result: &subroll_core::ExtractionResult = &$result;
        let expected: Vec<usize> = vec![$($line),*];
        pretty_assertions::assert_eq!(
            result.error_lines(),
            expected,
            "assert_error_lines! failed\n  errors: {:?}",
            result.errors
        );
    }};
}

/// Assert that every block of `text` is accounted for exactly once and that
/// offsets point at block starts in document order.
pub fn assert_block_accounting(text: &str, result: &ExtractionResult) {
    // Blocks are subslices of `text`, so their start offsets fall out of the
    // pointer difference.
    let starts: Vec<usize> = patterns::blocks(text)
        .map(|block| block.as_ptr() as usize - text.as_ptr() as usize)
        .collect();
    assert_eq!(
        result.block_count(),
        starts.len(),
        "hits + errors must equal the number of non-blank blocks\n  text: {text:?}"
    );

    let indices: Vec<usize> = result.entries().iter().map(|e| e.index()).collect();
    assert!(
        indices.windows(2).all(|w| w[0] <= w[1]),
        "block offsets are not in document order: {indices:?}"
    );
    pretty_assertions::assert_eq!(indices, starts, "offsets must point at block starts\n  text: {text:?}");
}
