//! Headless output rendering.
//!
//! A [`Report`] borrows one processed document and renders it in any of the
//! [`OutputFormat`]s. Line numbers always refer to the normalized text.

use crate::headless::OutputFormat;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write as _;
use subroll_core::{
    extractor::explain_noise,
    patterns::trim_space,
    position,
    summary::{self, DisplayNameSource, SummaryRow},
    BlockErrorKind, Entry, ExtractionError, ExtractionHit, ExtractionResult,
};

// ---------------------------------------------------------------------------
// Serialized records
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct HitRecord<'a> {
    name: &'a str,
    index: usize,
    line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorRecord<'a> {
    index: usize,
    line: usize,
    kind: BlockErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    explain: Option<Explain<'a>>,
}

/// What the extractor saw on an unparseable block's first line.
#[derive(Debug, Serialize)]
struct Explain<'a> {
    text: &'a str,
    /// Denylist entries that fired on `text`.
    labels: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct SummaryRecord<'a> {
    name: &'a str,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    hits: Vec<HitRecord<'a>>,
    errors: Vec<ErrorRecord<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Vec<SummaryRecord<'a>>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsonLine<'a> {
    Hit(HitRecord<'a>),
    Error(ErrorRecord<'a>),
    Summary(SummaryRecord<'a>),
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

pub struct Report<'a> {
    text: &'a str,
    result: &'a ExtractionResult,
    names: &'a HashMap<String, String>,
    explain: bool,
    /// Filtered summary rows; `None` renders per-block entries instead.
    summary: Option<Vec<SummaryRow>>,
}

impl<'a> Report<'a> {
    pub fn new(
        text: &'a str,
        result: &'a ExtractionResult,
        names: &'a HashMap<String, String>,
    ) -> Self {
        Self { text, result, names, explain: false, summary: None }
    }

    pub fn explain(mut self, on: bool) -> Self {
        self.explain = on;
        self
    }

    /// Render the per-login summary instead of per-block entries, keeping
    /// rows that match `query`.
    pub fn summary(mut self, query: Option<&str>) -> Self {
        let rows = summary::tally(&self.result.hits);
        let names: &dyn DisplayNameSource = self.names;
        self.summary = Some(summary::filter_rows(&rows, query.unwrap_or(""), Some(names)));
        self
    }

    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        Ok(match format {
            OutputFormat::Text => self.render_text(),
            OutputFormat::Names => self.render_names(),
            OutputFormat::Json => {
                let mut out = serde_json::to_string_pretty(&self.json_document())?;
                out.push('\n');
                out
            }
            OutputFormat::Jsonl => self.render_jsonl()?,
        })
    }

    /// One-line tally for stderr.
    pub fn footer(&self) -> String {
        let errors = &self.result.errors;
        let mut out = format!(
            "{} hits, {} users, {} unparseable",
            self.result.hits.len(),
            summary::tally(&self.result.hits).len(),
            errors.len()
        );
        if !errors.is_empty() {
            let lines: Vec<String> = errors.iter().map(|e| e.line.to_string()).collect();
            let _ = write!(out, " (line {})", lines.join(", "));
        }
        out
    }

    fn display_name(&self, login: &str) -> Option<String> {
        self.names.display_name(login)
    }

    fn label(&self, login: &str) -> String {
        summary::display_label(login, self.display_name(login).as_deref())
    }

    fn line_of(&self, index: usize) -> usize {
        position::line_number_at(self.text, index)
    }

    fn explain_error(&self, err: &ExtractionError) -> Option<Explain<'a>> {
        if !self.explain {
            return None;
        }
        let text = trim_space(self.text[err.index..].lines().next().unwrap_or(""));
        Some(Explain { text, labels: explain_noise(text) })
    }

    fn hit_record(&self, hit: &'a ExtractionHit) -> HitRecord<'a> {
        HitRecord {
            name: &hit.name,
            index: hit.index,
            line: self.line_of(hit.index),
            display_name: self.display_name(&hit.name),
        }
    }

    fn error_record(&self, err: &ExtractionError) -> ErrorRecord<'a> {
        ErrorRecord {
            index: err.index,
            line: err.line,
            kind: err.kind,
            explain: self.explain_error(err),
        }
    }

    fn summary_record<'r>(&self, row: &'r SummaryRow) -> SummaryRecord<'r> {
        SummaryRecord {
            name: &row.name,
            count: row.count,
            display_name: self.display_name(&row.name),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        if let Some(rows) = &self.summary {
            for row in rows {
                let _ = writeln!(out, "{:>5}  {}", row.count, self.label(&row.name));
            }
            return out;
        }
        for entry in self.result.entries() {
            match entry {
                Entry::Hit(hit) => {
                    let _ = writeln!(out, "{:>5}  {}", self.line_of(hit.index), self.label(&hit.name));
                }
                Entry::Error(err) => {
                    let _ = write!(out, "{:>5}  !! {}", err.line, err.kind);
                    if let Some(explain) = self.explain_error(err) {
                        let _ = write!(out, ": {:?}", explain.text);
                        if !explain.labels.is_empty() {
                            let _ = write!(out, " [denylist: {}]", explain.labels.join(", "));
                        }
                    }
                    out.push('\n');
                }
            }
        }
        out
    }

    fn render_names(&self) -> String {
        let names: Vec<&str> = match &self.summary {
            Some(rows) => rows.iter().map(|r| r.name.as_str()).collect(),
            None => self.result.hits.iter().map(|h| h.name.as_str()).collect(),
        };
        names.iter().map(|n| format!("{n}\n")).collect()
    }

    fn json_document(&self) -> JsonDocument<'_> {
        JsonDocument {
            hits: self.result.hits.iter().map(|h| self.hit_record(h)).collect(),
            errors: self.result.errors.iter().map(|e| self.error_record(e)).collect(),
            summary: self
                .summary
                .as_ref()
                .map(|rows| rows.iter().map(|r| self.summary_record(r)).collect()),
        }
    }

    fn render_jsonl(&self) -> anyhow::Result<String> {
        let records: Vec<JsonLine> = match &self.summary {
            Some(rows) => rows.iter().map(|r| JsonLine::Summary(self.summary_record(r))).collect(),
            None => self
                .result
                .entries()
                .into_iter()
                .map(|entry| match entry {
                    Entry::Hit(hit) => JsonLine::Hit(self.hit_record(hit)),
                    Entry::Error(err) => JsonLine::Error(self.error_record(err)),
                })
                .collect(),
        };
        let mut out = String::new();
        for record in &records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
