//! Help popup: centred overlay listing keybindings and commands.
//!
//! Toggle with `?`; close with `?` or `Escape`.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

const BINDINGS: &[(&str, &str)] = &[
    ("q  /  Ctrl+c", "Quit"),
    ("Tab", "Cycle focus: source → results → users → filter"),
    ("/", "Focus the user filter"),
    ("Escape", "Leave the filter (clears it when already empty)"),
    ("↑ k  /  ↓ j", "Move the cursor"),
    ("PageUp / PageDown", "Move one page"),
    ("g  /  G", "First / last line or row"),
    ("e", "Jump to the next unparseable block"),
    ("n", "Toggle display names"),
    ("Enter (users)", "Jump to that user's next hit"),
    ("?", "Toggle this help popup"),
];

const COMMANDS: &[(&str, &str)] = &[
    (":q", "Quit"),
    (":line N", "Jump to line N"),
    (":names [on|off]", "Show or hide display names"),
    (":theme NAME", "Switch theme (default, gruvbox)"),
    (":reload", "Re-read the file"),
    (":write", "Save the normalized text to the file"),
];

pub struct HelpPopup<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (BINDINGS.len() + COMMANDS.len() + 3) as u16;
        let popup = centered_rect(72, height, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" subroll keybindings (? to close) ")
            .border_style(self.theme.border_focused);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines: Vec<Line> = BINDINGS.iter().map(binding_line).collect();
        lines.push(Line::from(""));
        lines.extend(COMMANDS.iter().map(binding_line));

        Paragraph::new(lines).render(inner, buf);
    }
}

fn binding_line(&(key, desc): &(&'static str, &'static str)) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<20}"), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(desc),
    ])
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
