//! Core types for subroll-core.
//!
//! This module defines the values that flow out of the extractor: the
//! recovered [`ExtractionHit`], the block-scoped [`ExtractionError`], and the
//! [`ExtractionResult`] pair that carries both in document order.

use serde::Serialize;

/// A login recovered from one pasted notification block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExtractionHit {
    /// The recovered login. Always matches `^[A-Za-z0-9_]{4,25}$`.
    pub name: String,
    /// Byte offset of the block's first character in the scanned text.
    pub index: usize,
}

/// Why a block could not be turned into a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum BlockErrorKind {
    /// The block had no non-whitespace line after trimming.
    #[error("empty block")]
    EmptyBlock,
    /// Nothing token-shaped survived noise stripping.
    #[error("no recoverable login")]
    NoRecoverableToken,
}

/// A block that produced no hit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct ExtractionError {
    /// 1-based line number where the block begins.
    pub line: usize,
    /// Byte offset of the block's first character, comparable with
    /// [`ExtractionHit::index`].
    pub index: usize,
    pub kind: BlockErrorKind,
}

/// Everything one extraction pass found, hits and errors each in block order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub hits: Vec<ExtractionHit>,
    pub errors: Vec<ExtractionError>,
}

impl ExtractionResult {
    /// Number of blocks this result covers (one entry per block).
    pub fn block_count(&self) -> usize {
        self.hits.len() + self.errors.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error line numbers in document order.
    pub fn error_lines(&self) -> Vec<usize> {
        self.errors.iter().map(|e| e.line).collect()
    }

    /// Hits and errors merged back into a single document-ordered stream.
    pub fn entries(&self) -> Vec<Entry<'_>> {
        let mut out: Vec<Entry<'_>> = self
            .hits
            .iter()
            .map(Entry::Hit)
            .chain(self.errors.iter().map(Entry::Error))
            .collect();
        out.sort_by_key(Entry::index);
        out
    }
}

/// One block outcome, borrowed from an [`ExtractionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'a> {
    Hit(&'a ExtractionHit),
    Error(&'a ExtractionError),
}

impl Entry<'_> {
    pub fn index(&self) -> usize {
        match self {
            Entry::Hit(h) => h.index,
            Entry::Error(e) => e.index,
        }
    }
}

impl std::fmt::Display for ExtractionHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
