//! subroll-core: the text pipeline behind subroll.
//!
//! Pasted Twitch sub/gift notifications go through three pure stages plus a
//! few consumer-side helpers:
//!
//! ```text
//! raw text ──► normalizer ──► extractor ──► ExtractionResult
//!                                              │
//!                      summary / search ◄──────┤
//!                      resolver (display names)◄┘
//! ```
//!
//! The pipeline keeps no state between calls and performs no I/O; only the
//! [`resolver`] cache holds (in-memory) state.

pub mod config;
pub mod extractor;
pub mod normalizer;
pub mod patterns;
pub mod position;
pub mod resolver;
pub mod search;
pub mod summary;
pub mod types;

pub use extractor::extract;
pub use normalizer::normalize;
pub use search::fold_for_search;
pub use types::{BlockErrorKind, Entry, ExtractionError, ExtractionHit, ExtractionResult};

/// Normalize then extract, the way every surface runs the pipeline.
///
/// Returns the normalized text alongside the result because hit offsets and
/// error line numbers refer to it, not to `raw`.
pub fn process(raw: &str) -> (String, ExtractionResult) {
    let text = normalize(raw);
    let result = extract(&text);
    (text, result)
}
