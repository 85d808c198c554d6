//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. All state transitions live
//! on [`AppState`] so they can be tested without a terminal.

use crate::{
    commands::{execute_command, Command},
    document::Document,
    event::{self, AppEvent},
    names::NameLookups,
    theme::Theme,
    watch::FileWatch,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        help::HelpPopup,
        query_bar::{QueryBar, QueryBarState},
        result_list::{ResultList, ResultListState},
        source_view::{SourceView, SourceViewState},
        status_bar::StatusBar,
        summary_list::{SummaryList, SummaryListState},
    },
};
use crossterm::{
    event::{self as ct_event, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    Frame, Terminal,
};
use std::{io, time::Duration};
use subroll_core::{config::Config, summary, summary::DisplayNameSource};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Source,
    Results,
    Summary,
    QueryBar,
    /// Vim-style `:` command line is active.
    Command,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub doc: Document,
    pub source: SourceViewState,
    pub results: ResultListState,
    pub summary: SummaryListState,
    pub query: QueryBarState,
    pub command_bar: CommandBarState,
    pub focus: Focus,
    /// Focus before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub theme: Theme,
    pub config: Config,
    pub show_help: bool,
    pub show_names: bool,
    /// `None` when display-name lookup is disabled.
    pub names: Option<NameLookups>,
    /// One-line message for the status bar, replaced by the next one.
    pub status: Option<String>,
    pub quit: bool,
}

impl AppState {
    /// Display names start on whenever a lookup client is available.
    pub fn new(doc: Document, config: Config, theme: Theme, names: Option<NameLookups>) -> Self {
        let show_names = names.is_some();
        let mut state = Self {
            source: SourceViewState::new(doc.line_count()),
            results: ResultListState::default(),
            summary: SummaryListState::default(),
            query: QueryBarState::default(),
            command_bar: CommandBarState::default(),
            focus: Focus::Source,
            prev_focus: Focus::Source,
            theme,
            config,
            show_help: false,
            show_names,
            names,
            status: None,
            quit: false,
            doc,
        };
        if let Some(names) = &state.names {
            names.request(state.doc.logins());
        }
        state.refilter();
        state
    }

    pub fn notice(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::debug!(notice = %msg, "status notice");
        self.status = Some(msg);
    }

    /// Display names, when they are switched on.
    pub fn name_source(&self) -> Option<&dyn DisplayNameSource> {
        self.names.as_ref().filter(|_| self.show_names).map(NameLookups::source)
    }

    /// Recompute the visible summary rows from the query.
    pub fn refilter(&mut self) {
        let rows = summary::filter_rows(&self.doc.rows, &self.query.query, self.name_source());
        self.summary.set_rows(rows);
    }

    pub fn set_names(&mut self, on: bool) {
        let Some(names) = self.names.as_ref() else {
            self.notice("display-name lookup is disabled in config");
            return;
        };
        self.show_names = on;
        if on {
            let started = names.request(self.doc.logins());
            tracing::debug!(started, "names: shown");
        }
        self.notice(if on { "names: on" } else { "names: off" });
        self.refilter();
    }

    /// Pick up finished lookups. Returns `true` when anything changed.
    pub fn poll_names(&mut self) -> bool {
        let finished = self.names.as_ref().map(NameLookups::drain_finished).unwrap_or_default();
        if finished.is_empty() {
            return false;
        }
        if self.show_names {
            self.refilter();
        }
        true
    }

    /// Move the source cursor to 0-based `line` and select the hit there.
    pub fn jump_to_line(&mut self, line: usize) {
        self.source.jump_to(line);
        self.sync_results_to_source();
    }

    /// Select hit `i` and scroll the source pane to it.
    pub fn select_hit(&mut self, i: usize) {
        self.results.select(i, self.doc.result.hits.len());
        if let Some(line) = self.doc.hit_line(self.results.cursor) {
            self.source.jump_to(line);
        }
    }

    fn sync_results_to_source(&mut self) {
        if let Some(i) = self.doc.hit_for_line(self.source.cursor) {
            self.results.select(i, self.doc.result.hits.len());
        }
    }

    pub fn next_error(&mut self) {
        match self.doc.next_error_line(self.source.cursor) {
            Some(line) => {
                self.jump_to_line(line);
                self.focus = Focus::Source;
            }
            None => self.notice("no unparseable blocks"),
        }
    }

    /// Jump to the next hit of `login` after the selected one, wrapping.
    pub fn jump_to_next_hit_of(&mut self, login: &str) {
        let hits = &self.doc.result.hits;
        let after = self.results.cursor + 1;
        let next = hits[after.min(hits.len())..]
            .iter()
            .position(|h| h.name == login)
            .map(|p| p + after)
            .or_else(|| hits.iter().position(|h| h.name == login));
        if let Some(i) = next {
            self.select_hit(i);
        }
    }

    /// Swap in a freshly processed document, keeping positions where they
    /// still make sense.
    pub fn replace_document(&mut self, doc: Document) {
        self.doc = doc;
        self.after_document_change();
    }

    fn after_document_change(&mut self) {
        self.source.set_line_count(self.doc.line_count());
        self.sync_results_to_source();
        if self.show_names {
            if let Some(names) = self.names.as_ref() {
                names.request(self.doc.logins());
            }
        }
        self.refilter();
    }

    pub fn reload(&mut self) {
        match self.doc.reload() {
            Ok(true) => {
                self.after_document_change();
                let msg = format!(
                    "reloaded: {} hits, {} unparseable",
                    self.doc.result.hits.len(),
                    self.doc.result.errors.len()
                );
                self.notice(msg);
            }
            Ok(false) => self.notice("no changes"),
            Err(err) => {
                tracing::warn!(error = %err, "reload failed");
                self.notice(format!("reload failed: {err}"));
            }
        }
    }

    pub fn write(&mut self) {
        let outcome = self.doc.write_normalized().map(|p| p.display().to_string());
        match outcome {
            Ok(path) => self.notice(format!("wrote {path}")),
            Err(err) => self.notice(format!("write failed: {err}")),
        }
    }

    pub fn handle(&mut self, event: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            if matches!(event, AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("help popup closed");
                self.show_help = false;
            }
            return;
        }

        if self.focus == Focus::Command {
            self.handle_command_bar(event);
            return;
        }

        match event {
            AppEvent::Char('?') if self.focus != Focus::QueryBar => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }
            AppEvent::Char(':') if self.focus != Focus::QueryBar => {
                tracing::debug!(prev_focus = ?self.focus, "entering command mode");
                self.prev_focus = self.focus;
                self.command_bar.clear();
                self.focus = Focus::Command;
            }
            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
            }
            AppEvent::Escape => {
                if self.focus == Focus::QueryBar {
                    tracing::debug!("focus: QueryBar -> Summary");
                    self.focus = Focus::Summary;
                } else if self.query.clear() {
                    tracing::debug!("query cleared");
                    self.refilter();
                }
            }
            AppEvent::FocusNext => {
                let next = match self.focus {
                    Focus::Source => Focus::Results,
                    Focus::Results => Focus::Summary,
                    Focus::Summary => Focus::QueryBar,
                    Focus::QueryBar | Focus::Command => Focus::Source,
                };
                tracing::debug!(from = ?self.focus, to = ?next, "focus cycle");
                self.focus = next;
            }
            AppEvent::QueryFocus => {
                tracing::debug!("focus -> QueryBar");
                self.focus = Focus::QueryBar;
            }
            AppEvent::NextError => self.next_error(),
            AppEvent::ToggleNames => self.set_names(!self.show_names),
            AppEvent::Resize(_, _) => {}
            other => self.dispatch_to_focused(other),
        }
    }

    fn handle_command_bar(&mut self, event: AppEvent) {
        match event {
            AppEvent::Escape => {
                tracing::debug!("command bar cancelled");
                self.command_bar.clear();
                self.focus = self.prev_focus;
            }
            AppEvent::Enter => match Command::parse(&self.command_bar.input) {
                Ok(cmd) => {
                    tracing::debug!(command = ?cmd, "executing command");
                    self.command_bar.clear();
                    self.focus = self.prev_focus;
                    execute_command(self, cmd);
                }
                Err(msg) if msg.is_empty() => {
                    self.command_bar.clear();
                    self.focus = self.prev_focus;
                }
                Err(msg) => self.command_bar.error = Some(msg),
            },
            AppEvent::Quit => self.quit = true,
            other => self.command_bar.handle(&other),
        }
    }

    /// Route an event to the pane that owns the current focus.
    fn dispatch_to_focused(&mut self, event: AppEvent) {
        match self.focus {
            Focus::Source => {
                if self.source.handle(&event) {
                    self.sync_results_to_source();
                }
            }
            Focus::Results => {
                let len = self.doc.result.hits.len();
                if self.results.handle(&event, len) {
                    self.select_hit(self.results.cursor);
                }
            }
            Focus::Summary => match event {
                AppEvent::Enter => {
                    if let Some(login) = self.summary.selected().map(|r| r.name.clone()) {
                        tracing::debug!(login = %login, "summary: jump to next hit");
                        self.jump_to_next_hit_of(&login);
                    }
                }
                other => self.summary.handle(&other),
            },
            Focus::QueryBar => match event {
                AppEvent::Enter => self.focus = Focus::Summary,
                other => {
                    if self.query.handle(&other) {
                        self.refilter();
                    }
                }
            },
            Focus::Command => {}
        }
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::QueryBar | Focus::Command)
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
    watch: Option<FileWatch>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let watch = state.doc.path.as_deref().and_then(|path| match FileWatch::new(path) {
            Ok(w) => Some(w),
            Err(err) => {
                tracing::warn!(error = %err, "file watching unavailable");
                None
            }
        });
        Self { state, watch }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            terminal.draw(|frame| draw(frame, &self.state))?;

            if self.state.quit {
                break;
            }

            if self.watch.as_ref().is_some_and(FileWatch::changed) {
                tracing::debug!("watched file changed");
                self.state.reload();
            }
            self.state.poll_names();

            if ct_event::poll(Duration::from_millis(50))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        let app_event = if is_insert_mode(self.state.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                            self.state.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.state.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, s: &AppState) {
    let area = frame.area();

    // Vertical: body | 3-line query bar | 1-line status bar
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let horiz = Layout::default()
        .direction(LayoutDir::Horizontal)
        .constraints([
            Constraint::Percentage(s.config.ui.source_pane_width_pct),
            Constraint::Fill(1),
            Constraint::Percentage(s.config.ui.summary_pane_width_pct),
        ])
        .split(vert[0]);

    let names = s.name_source();
    let marked = s.doc.hit_line(s.results.cursor);

    frame.render_widget(
        SourceView::new(&s.source, &s.doc, &s.theme)
            .focused(s.focus == Focus::Source)
            .line_numbers(s.config.ui.show_line_numbers)
            .marked_line(marked),
        horiz[0],
    );
    frame.render_widget(
        ResultList::new(&s.results, &s.doc.result.hits, &s.doc.text, &s.theme)
            .focused(s.focus == Focus::Results)
            .names(names),
        horiz[1],
    );
    frame.render_widget(
        SummaryList::new(&s.summary, s.doc.rows.len(), &s.theme)
            .query(&s.query.query)
            .names(names)
            .focused(s.focus == Focus::Summary),
        horiz[2],
    );

    let matches = (s.summary.rows.len(), s.doc.rows.len());
    frame.render_widget(
        QueryBar::new(&s.query, s.focus == Focus::QueryBar, matches, &s.theme),
        vert[1],
    );

    let error_lines = s.doc.result.error_lines();
    let pending = match (&s.names, s.show_names) {
        (Some(n), true) => n.pending(s.doc.logins()),
        _ => 0,
    };
    frame.render_widget(
        StatusBar {
            users: s.doc.rows.len(),
            hits: s.doc.result.hits.len(),
            error_lines: &error_lines,
            names_on: s.show_names,
            pending_names: pending,
            modified: s.doc.modified,
            notice: s.status.as_deref(),
            theme: &s.theme,
        },
        vert[2],
    );

    if s.show_help {
        frame.render_widget(HelpPopup::new(&s.theme), area);
    }

    // Command bar overlays the status row
    if s.focus == Focus::Command {
        let cmd_area = Rect { y: area.bottom().saturating_sub(1), height: 1, ..area };
        frame.render_widget(CommandBar::new(&s.command_bar, &s.theme), cmd_area);
        frame.set_cursor_position((s.command_bar.cursor_col(cmd_area), cmd_area.y));
        return;
    }

    if s.focus == Focus::QueryBar {
        let qb = QueryBar::new(&s.query, true, matches, &s.theme);
        frame.set_cursor_position(qb.cursor_position(vert[1]));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
