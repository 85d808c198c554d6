//! Results pane: one row per extracted login, in document order.
//!
//! Moving the cursor here drives the source pane to the hit's line; moving
//! the source cursor selects the nearest hit at or before it.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget, Widget},
};
use subroll_core::{
    position,
    summary::{self, DisplayNameSource},
    ExtractionHit,
};

const PAGE_STEP: usize = 10;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ResultListState {
    /// Index into the hit list; meaningless while the list is empty.
    pub cursor: usize,
}

impl ResultListState {
    pub fn select(&mut self, index: usize, len: usize) {
        self.cursor = index.min(len.saturating_sub(1));
    }

    /// Handle a navigation event over a list of `len` hits. Returns `true`
    /// when the selection moved.
    pub fn handle(&mut self, event: &AppEvent, len: usize) -> bool {
        if len == 0 {
            return false;
        }
        let before = self.cursor;
        let last = len - 1;
        self.cursor = match event {
            AppEvent::Nav(Direction::Up) => self.cursor.saturating_sub(1),
            AppEvent::Nav(Direction::Down) => (self.cursor + 1).min(last),
            AppEvent::ScrollUp => self.cursor.saturating_sub(PAGE_STEP),
            AppEvent::ScrollDown => (self.cursor + PAGE_STEP).min(last),
            AppEvent::ScrollToTop => 0,
            AppEvent::ScrollToBottom => last,
            _ => return false,
        };
        if self.cursor != before {
            tracing::debug!(cursor = self.cursor, "results: cursor moved");
        }
        self.cursor != before
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct ResultList<'a> {
    state: &'a ResultListState,
    hits: &'a [ExtractionHit],
    text: &'a str,
    /// Display-name lookup, `None` while names are hidden.
    names: Option<&'a dyn DisplayNameSource>,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> ResultList<'a> {
    pub fn new(
        state: &'a ResultListState,
        hits: &'a [ExtractionHit],
        text: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self { state, hits, text, names: None, focused: false, theme }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn names(mut self, names: Option<&'a dyn DisplayNameSource>) -> Self {
        self.names = names;
        self
    }
}

impl Widget for ResultList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(format!(" Results ({}) ", self.hits.len()))
            .border_style(self.theme.border(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        let items: Vec<ListItem> = self
            .hits
            .iter()
            .map(|hit| {
                let line = position::line_number_at(self.text, hit.index);
                let display = self.names.and_then(|source| source.display_name(&hit.name));
                let label = summary::display_label(&hit.name, display.as_deref());
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{line:>5} "), self.theme.line_number),
                    Span::styled(label, self.theme.name_style(&hit.name)),
                ]))
            })
            .collect();

        let list = List::new(items).highlight_style(self.theme.result_selected);
        let selected = (!self.hits.is_empty()).then_some(self.state.cursor);
        let mut list_state = ListState::default().with_selected(selected);
        StatefulWidget::render(list, inner, buf, &mut list_state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
