//! Source pane: the normalized text with line numbers, styled by block
//! outcome.
//!
//! # Navigation (when focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k`, `↓` / `j` | Move the cursor one line |
//! | `PageUp` / `Ctrl+u`, `PageDown` / `Ctrl+d` | Move one page |
//! | `g` / `G` | First / last line |
//!
//! `top` is the first visible line and `cursor` the highlighted one; the
//! window follows the cursor.

use std::cell::Cell;

use crate::document::{Document, LineKind};
use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{
        Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};

const PAGE_STEP: usize = 10;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct SourceViewState {
    /// 0-based line under the cursor.
    pub cursor: usize,
    /// First visible line.
    pub top: usize,
    line_count: usize,
    /// Cached from the last render so `handle()` can keep the cursor visible.
    last_height: Cell<usize>,
}

impl SourceViewState {
    pub fn new(line_count: usize) -> Self {
        Self { cursor: 0, top: 0, line_count, last_height: Cell::new(20) }
    }

    fn height(&self) -> usize {
        self.last_height.get().max(1)
    }

    fn last_line(&self) -> usize {
        self.line_count.saturating_sub(1)
    }

    /// Adopt a new document length, keeping the cursor where it was if it
    /// still exists.
    pub fn set_line_count(&mut self, line_count: usize) {
        self.line_count = line_count;
        self.cursor = self.cursor.min(self.last_line());
        self.follow_cursor();
    }

    /// Move the cursor to `line` and bring it into the middle of the view.
    pub fn jump_to(&mut self, line: usize) {
        self.cursor = line.min(self.last_line());
        self.top = self.cursor.saturating_sub(self.height() / 2);
        tracing::debug!(cursor = self.cursor, top = self.top, "source: jump");
    }

    fn follow_cursor(&mut self) {
        let height = self.height();
        if self.cursor < self.top {
            self.top = self.cursor;
        } else if self.cursor >= self.top + height {
            self.top = self.cursor + 1 - height;
        }
    }

    /// Handle a navigation event. Returns `true` when the cursor moved.
    pub fn handle(&mut self, event: &AppEvent) -> bool {
        let before = self.cursor;
        match event {
            AppEvent::Nav(Direction::Up) => self.cursor = self.cursor.saturating_sub(1),
            AppEvent::Nav(Direction::Down) => self.cursor = (self.cursor + 1).min(self.last_line()),
            AppEvent::ScrollUp => self.cursor = self.cursor.saturating_sub(PAGE_STEP),
            AppEvent::ScrollDown => {
                self.cursor = (self.cursor + PAGE_STEP).min(self.last_line())
            }
            AppEvent::ScrollToTop => self.cursor = 0,
            AppEvent::ScrollToBottom => self.cursor = self.last_line(),
            _ => return false,
        }
        self.follow_cursor();
        if self.cursor != before {
            tracing::debug!(cursor = self.cursor, top = self.top, "source: cursor moved");
        }
        self.cursor != before
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct SourceView<'a> {
    state: &'a SourceViewState,
    doc: &'a Document,
    focused: bool,
    line_numbers: bool,
    /// Line of the currently selected hit, marked in the gutter.
    marked_line: Option<usize>,
    theme: &'a Theme,
}

impl<'a> SourceView<'a> {
    pub fn new(state: &'a SourceViewState, doc: &'a Document, theme: &'a Theme) -> Self {
        Self { state, doc, focused: false, line_numbers: true, marked_line: None, theme }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn line_numbers(mut self, on: bool) -> Self {
        self.line_numbers = on;
        self
    }

    pub fn marked_line(mut self, line: Option<usize>) -> Self {
        self.marked_line = line;
        self
    }

    fn line_style(&self, kind: LineKind) -> Style {
        match kind {
            LineKind::HitStart => self.theme.source_hit,
            LineKind::Error => self.theme.source_error,
            LineKind::Placeholder => self.theme.source_placeholder,
            LineKind::Plain | LineKind::Blank => Style::default(),
        }
    }
}

impl Widget for SourceView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(format!(" {} ", self.doc.title()))
            .border_style(self.theme.border(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        let height = inner.height as usize;
        self.state.last_height.set(height);

        let total = self.doc.line_count();
        let start = self.state.top.min(total);
        let end = (start + height).min(total);
        let gutter = total.to_string().len();

        let lines: Vec<Line> = self
            .doc
            .text
            .split('\n')
            .zip(&self.doc.kinds)
            .enumerate()
            .skip(start)
            .take(end - start)
            .map(|(i, (text, kind))| {
                let mut spans = Vec::with_capacity(3);
                let marker = if Some(i) == self.marked_line { "▶" } else { " " };
                if self.line_numbers {
                    spans.push(Span::styled(
                        format!("{marker}{:>gutter$} ", i + 1),
                        self.theme.line_number,
                    ));
                } else {
                    spans.push(Span::styled(marker.to_string(), self.theme.line_number));
                }
                spans.push(Span::styled(text, self.line_style(*kind)));
                let line = Line::from(spans);
                if i == self.state.cursor {
                    line.patch_style(self.theme.source_cursor)
                } else {
                    line
                }
            })
            .collect();

        let text_area = Rect { width: inner.width.saturating_sub(1), ..inner };
        let sb_area = Rect { x: inner.right().saturating_sub(1), width: 1, ..inner };
        Paragraph::new(lines).render(text_area, buf);

        if total > height {
            let mut sb_state = ScrollbarState::new(total)
                .position(start)
                .viewport_content_length(height);
            StatefulWidget::render(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(None)
                    .end_symbol(None),
                sb_area,
                buf,
                &mut sb_state,
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn state(lines: usize, height: usize) -> SourceViewState {
        let s = SourceViewState::new(lines);
        s.last_height.set(height);
        s
    }

    #[test]
    fn cursor_is_clamped_to_document() {
        let mut s = state(3, 10);
        assert!(!s.handle(&AppEvent::Nav(Direction::Up)));
        s.handle(&AppEvent::ScrollDown);
        assert_eq!(s.cursor, 2);
        assert!(!s.handle(&AppEvent::Nav(Direction::Down)));
    }

    #[test]
    fn window_follows_cursor() {
        let mut s = state(100, 10);
        for _ in 0..12 {
            s.handle(&AppEvent::Nav(Direction::Down));
        }
        assert_eq!(s.cursor, 12);
        assert_eq!(s.top, 3);
        s.handle(&AppEvent::ScrollToTop);
        assert_eq!((s.cursor, s.top), (0, 0));
        s.handle(&AppEvent::ScrollToBottom);
        assert_eq!((s.cursor, s.top), (99, 90));
    }

    #[test]
    fn jump_centres_target() {
        let mut s = state(100, 10);
        s.jump_to(50);
        assert_eq!((s.cursor, s.top), (50, 45));
        s.jump_to(500);
        assert_eq!(s.cursor, 99);
    }

    #[test]
    fn shrinking_document_clamps_cursor() {
        let mut s = state(100, 10);
        s.jump_to(80);
        s.set_line_count(5);
        assert_eq!(s.cursor, 4);
        assert!(s.top <= 4);
    }

    #[test]
    fn renders_line_numbers_and_marker() {
        let doc = Document::from_raw(None, "abcd1234\nsub\n\n");
        let theme = Theme::load_default();
        let s = state(doc.line_count(), 5);
        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        SourceView::new(&s, &doc, &theme)
            .marked_line(Some(0))
            .render(area, &mut buf);
        let row: String = (1..19).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.starts_with("▶1 abcd1234"), "{row:?}");
    }
}
