//! The document being inspected: normalized text plus everything derived
//! from it.
//!
//! Every surface shows the *normalized* text, because hit offsets and error
//! line numbers refer to it. Reloading re-runs the whole pipeline.

use std::path::{Path, PathBuf};
use subroll_core::{
    patterns::{trim_space, PLACEHOLDER_LINE},
    position,
    summary::{self, SummaryRow},
    ExtractionResult,
};

/// How the source pane should style one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Plain,
    /// First line of a block that produced a hit.
    HitStart,
    /// Any line of a block that produced an error.
    Error,
    Placeholder,
    Blank,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub path: Option<PathBuf>,
    /// Normalized text.
    pub text: String,
    pub result: ExtractionResult,
    pub rows: Vec<SummaryRow>,
    /// Per-line styling, indexed by 0-based line.
    pub kinds: Vec<LineKind>,
    /// True when normalization changed the raw input, so `:write` has
    /// something to do.
    pub modified: bool,
}

impl Document {
    pub fn from_raw(path: Option<PathBuf>, raw: &str) -> Self {
        let (text, result) = subroll_core::process(raw);
        let rows = summary::tally(&result.hits);
        let kinds = classify_lines(&text, &result);
        let modified = text != raw;
        tracing::debug!(
            hits = result.hits.len(),
            errors = result.errors.len(),
            modified,
            "document: processed"
        );
        Self { path, text, result, rows, kinds, modified }
    }

    /// Read `path` (invalid UTF-8 is replaced) and process it.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)?;
        let raw = String::from_utf8_lossy(&bytes);
        Ok(Self::from_raw(Some(path.to_path_buf()), &raw))
    }

    /// Re-read the backing file. Returns `false` (and leaves `self` alone)
    /// when the normalized text did not change.
    pub fn reload(&mut self) -> anyhow::Result<bool> {
        let Some(path) = self.path.clone() else {
            return Ok(false);
        };
        let fresh = Self::load(&path)?;
        if fresh.text == self.text {
            return Ok(false);
        }
        *self = fresh;
        Ok(true)
    }

    /// Overwrite the backing file with the normalized text.
    pub fn write_normalized(&mut self) -> anyhow::Result<&Path> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no file to write (input came from stdin)"))?;
        std::fs::write(path, &self.text)?;
        self.modified = false;
        tracing::debug!(path = %path.display(), "document: wrote normalized text");
        Ok(path)
    }

    pub fn line_count(&self) -> usize {
        self.kinds.len()
    }

    /// 0-based line of hit `i`.
    pub fn hit_line(&self, i: usize) -> Option<usize> {
        let hit = self.result.hits.get(i)?;
        Some(position::line_number_at(&self.text, hit.index) - 1)
    }

    /// Byte offset where 0-based `line` starts.
    pub fn line_offset(&self, line: usize) -> usize {
        position::line_start(&self.text, line + 1).unwrap_or(self.text.len())
    }

    /// Index into `result.hits` of the hit at or before 0-based `line`.
    pub fn hit_for_line(&self, line: usize) -> Option<usize> {
        summary::hit_at_or_before(&self.result.hits, self.line_offset(line))
    }

    /// First error line (0-based) strictly after `line`, wrapping to the top.
    pub fn next_error_line(&self, line: usize) -> Option<usize> {
        let lines: Vec<usize> = self.result.errors.iter().map(|e| e.line - 1).collect();
        lines
            .iter()
            .copied()
            .find(|&l| l > line)
            .or_else(|| lines.first().copied())
    }

    /// Logins in document order, for display-name lookups.
    pub fn logins(&self) -> impl Iterator<Item = &str> {
        self.result.hits.iter().map(|h| h.name.as_str())
    }

    pub fn title(&self) -> String {
        self.path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<stdin>".to_string())
    }
}

fn classify_lines(text: &str, result: &ExtractionResult) -> Vec<LineKind> {
    let hit_lines: Vec<usize> = result
        .hits
        .iter()
        .map(|h| position::line_number_at(text, h.index))
        .collect();
    let error_lines = result.error_lines();

    let mut in_error = false;
    text.split('\n')
        .enumerate()
        .map(|(i, line)| {
            let number = i + 1;
            if trim_space(line).is_empty() {
                in_error = false;
                return LineKind::Blank;
            }
            if error_lines.binary_search(&number).is_ok() {
                in_error = true;
            }
            if in_error {
                LineKind::Error
            } else if line == PLACEHOLDER_LINE {
                LineKind::Placeholder
            } else if hit_lines.binary_search(&number).is_ok() {
                LineKind::HitStart
            } else {
                LineKind::Plain
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PASTE: &str = "abcd1234\nプライム登録しました\n\n!!! ??\n\nlast_login";

    #[test]
    fn lines_are_classified() {
        let doc = Document::from_raw(None, PASTE);
        use LineKind::*;
        assert_eq!(
            doc.kinds,
            vec![HitStart, Plain, Blank, Error, Blank, HitStart, Placeholder, Blank, Blank]
        );
    }

    #[test]
    fn normalization_marks_document_modified() {
        assert!(Document::from_raw(None, PASTE).modified);
        let doc = Document::from_raw(None, "abcd1234\nsub\n\n");
        assert!(!doc.modified);
    }

    #[test]
    fn next_error_wraps() {
        let doc = Document::from_raw(None, "!!!\n\nabcd1234\nx\n\n???\n\n");
        assert_eq!(doc.next_error_line(0), Some(5));
        assert_eq!(doc.next_error_line(5), Some(0));
        let clean = Document::from_raw(None, "abcd1234\nx\n\n");
        assert_eq!(clean.next_error_line(0), None);
    }

    #[test]
    fn hit_lookup_by_line() {
        let doc = Document::from_raw(None, "first_one\nx\n\nsecond_one\ny\n\n");
        assert_eq!(doc.hit_line(1), Some(3));
        assert_eq!(doc.hit_for_line(0), Some(0));
        assert_eq!(doc.hit_for_line(2), Some(0));
        assert_eq!(doc.hit_for_line(4), Some(1));
    }

    #[test]
    fn reload_and_write_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paste.txt");
        std::fs::write(&path, "abcd1234\r\nsub\r\n").unwrap();

        let mut doc = Document::load(&path).unwrap();
        assert!(doc.modified);
        assert!(!doc.reload().unwrap());

        doc.write_normalized().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "abcd1234\nsub\n\n");

        std::fs::write(&path, "abcd1234\nsub\n\nother_user\nsub\n\n").unwrap();
        assert!(doc.reload().unwrap());
        assert_eq!(doc.result.hits.len(), 2);
    }

    #[test]
    fn stdin_document_cannot_be_written() {
        let mut doc = Document::from_raw(None, "abcd1234\n");
        assert!(doc.write_normalized().is_err());
        assert_eq!(doc.title(), "<stdin>");
    }
}
