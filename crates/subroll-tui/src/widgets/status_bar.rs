//! Status bar: user count, unparseable lines and the last notice, on one row.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// How many error line numbers fit before the list is cut short.
const MAX_LISTED_ERRORS: usize = 8;

pub struct StatusBar<'a> {
    pub users: usize,
    pub hits: usize,
    /// 1-based unparseable line numbers.
    pub error_lines: &'a [usize],
    pub names_on: bool,
    pub pending_names: usize,
    pub modified: bool,
    pub notice: Option<&'a str>,
    pub theme: &'a Theme,
}

/// `3, 9, 14` or `3, 9, … (+5)` once the list gets long.
pub fn format_error_lines(lines: &[usize]) -> String {
    let shown: Vec<String> = lines.iter().take(MAX_LISTED_ERRORS).map(usize::to_string).collect();
    let mut out = shown.join(", ");
    if lines.len() > MAX_LISTED_ERRORS {
        out.push_str(&format!(", … (+{})", lines.len() - MAX_LISTED_ERRORS));
    }
    out
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.theme.status_bar);

        let mut spans = vec![Span::raw(format!(" {} users · {} hits ", self.users, self.hits))];
        if self.error_lines.is_empty() {
            spans.push(Span::styled("· all blocks parsed ", self.theme.status_ok));
        } else {
            spans.push(Span::styled(
                format!("· unparseable: {} ", format_error_lines(self.error_lines)),
                self.theme.status_error,
            ));
        }
        if self.names_on {
            let names = if self.pending_names > 0 {
                format!("· names ({} pending) ", self.pending_names)
            } else {
                "· names ".to_string()
            };
            spans.push(Span::raw(names));
        }
        if self.modified {
            spans.push(Span::styled("· normalized ●", self.theme.status_notice));
        }
        if let Some(notice) = self.notice {
            spans.push(Span::styled(format!("  {notice}"), self.theme.status_notice));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        let hint = " q:quit  ?:help ";
        let hint_x = area.right().saturating_sub(hint.len() as u16);
        buf.set_string(hint_x, area.y, hint, Style::default().add_modifier(Modifier::DIM));
    }
}
