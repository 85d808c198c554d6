//! Summary pane: per-login counts, filtered by the query bar.
//!
//! `Enter` on a row asks the app to jump to that login's next hit.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget, Widget},
};
use subroll_core::summary::{self, DisplayNameSource, SummaryRow};

#[derive(Debug, Default)]
pub struct SummaryListState {
    /// Rows that pass the current filter.
    pub rows: Vec<SummaryRow>,
    pub cursor: usize,
}

impl SummaryListState {
    /// Replace the visible rows, keeping the cursor on the same login when it
    /// survives the filter.
    pub fn set_rows(&mut self, rows: Vec<SummaryRow>) {
        let current = self.selected().map(|r| r.name.clone());
        self.cursor = current
            .and_then(|name| rows.iter().position(|r| r.name == name))
            .unwrap_or(0);
        self.rows = rows;
    }

    pub fn selected(&self) -> Option<&SummaryRow> {
        self.rows.get(self.cursor)
    }

    pub fn handle(&mut self, event: &AppEvent) {
        let last = self.rows.len().saturating_sub(1);
        match event {
            AppEvent::Nav(Direction::Up) => self.cursor = self.cursor.saturating_sub(1),
            AppEvent::Nav(Direction::Down) => self.cursor = (self.cursor + 1).min(last),
            AppEvent::ScrollToTop => self.cursor = 0,
            AppEvent::ScrollToBottom => self.cursor = last,
            _ => return,
        }
        tracing::debug!(cursor = self.cursor, "summary: cursor moved");
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct SummaryList<'a> {
    state: &'a SummaryListState,
    /// Unfiltered row count, for the title.
    total: usize,
    query: &'a str,
    names: Option<&'a dyn DisplayNameSource>,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> SummaryList<'a> {
    pub fn new(state: &'a SummaryListState, total: usize, theme: &'a Theme) -> Self {
        Self { state, total, query: "", names: None, focused: false, theme }
    }

    pub fn query(mut self, query: &'a str) -> Self {
        self.query = query;
        self
    }

    pub fn names(mut self, names: Option<&'a dyn DisplayNameSource>) -> Self {
        self.names = names;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn row_line(&self, row: &'a SummaryRow) -> Line<'a> {
        let mut spans = vec![Span::styled(format!("{:>4} ", row.count), self.theme.result_count)];
        spans.extend(highlight(&row.name, self.query.trim(), self.theme));
        if let Some(display) = self.names.and_then(|n| n.display_name(&row.name)) {
            let label = summary::display_label(&row.name, Some(&display));
            let suffix = label[row.name.len()..].to_string();
            if !suffix.is_empty() {
                spans.push(Span::styled(suffix, self.theme.result_display));
            }
        }
        Line::from(spans)
    }
}

/// Split `name` around the first ASCII case-insensitive occurrence of
/// `query`, styling the match.
fn highlight<'a>(name: &'a str, query: &str, theme: &Theme) -> Vec<Span<'a>> {
    let style = theme.name_style(name);
    if query.is_empty() {
        return vec![Span::styled(name, style)];
    }
    match name.to_ascii_lowercase().find(&query.to_ascii_lowercase()) {
        Some(at) if name.is_char_boundary(at) && name.is_char_boundary(at + query.len()) => {
            let end = at + query.len();
            vec![
                Span::styled(&name[..at], style),
                Span::styled(&name[at..end], theme.search_highlight),
                Span::styled(&name[end..], style),
            ]
        }
        _ => vec![Span::styled(name, style)],
    }
}

impl Widget for SummaryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let shown = self.state.rows.len();
        let title = if shown == self.total {
            format!(" Users ({}) ", self.total)
        } else {
            format!(" Users ({shown}/{}) ", self.total)
        };
        let block = Block::bordered()
            .title(title)
            .border_style(self.theme.border(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        let items: Vec<ListItem> = self
            .state
            .rows
            .iter()
            .map(|row| ListItem::new(self.row_line(row)))
            .collect();

        let list = List::new(items).highlight_style(self.theme.result_selected);
        let selected = (!self.state.rows.is_empty()).then_some(self.state.cursor);
        let mut list_state = ListState::default().with_selected(selected);
        StatefulWidget::render(list, inner, buf, &mut list_state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
