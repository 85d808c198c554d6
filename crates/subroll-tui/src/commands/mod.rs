//! `:` commands: parsing and execution against the app state.
//!
//! | Command | Action |
//! |---------|--------|
//! | `q`, `quit` | Quit |
//! | `help` | Toggle the help popup |
//! | `theme <name>` | Switch theme (`default`, `gruvbox`) |
//! | `names [on\|off]` | Toggle, or set, display names |
//! | `line <n>`, `<n>` | Jump the source cursor to line `n` |
//! | `reload`, `e` | Re-read the file |
//! | `write`, `w` | Save the normalized text to the file |

use crate::{app::AppState, theme::{Theme, THEME_NAMES}};

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Theme(String),
    /// `None` toggles.
    Names(Option<bool>),
    /// 1-based line.
    Line(usize),
    Reload,
    Write,
}

impl Command {
    /// Parse the text after the `:` prefix.
    ///
    /// An empty string returns `Err("")` as a sentinel meaning "close without
    /// acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" | "q!" => Ok(Command::Quit),
            "help" | "h" => Ok(Command::Help),
            "reload" | "e" | "edit" => Ok(Command::Reload),
            "write" | "w" => Ok(Command::Write),
            "theme" => {
                if rest.is_empty() {
                    Err(format!("usage: theme <{}>", THEME_NAMES.join("|")))
                } else {
                    Ok(Command::Theme(rest.to_string()))
                }
            }
            "names" => match rest {
                "" => Ok(Command::Names(None)),
                "on" => Ok(Command::Names(Some(true))),
                "off" => Ok(Command::Names(Some(false))),
                _ => Err("usage: names [on|off]".to_string()),
            },
            "line" | "l" => parse_line(rest),
            w if w.chars().all(|c| c.is_ascii_digit()) => parse_line(w),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

fn parse_line(arg: &str) -> Result<Command, String> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(Command::Line(n)),
        _ => Err("usage: line <n> (n ≥ 1)".to_string()),
    }
}

/// Execute a parsed [`Command`] against the application state.
pub fn execute_command(s: &mut AppState, cmd: Command) {
    match cmd {
        Command::Quit => s.quit = true,
        Command::Help => s.show_help = !s.show_help,
        Command::Theme(name) => match Theme::by_name(&name) {
            Some(theme) => {
                s.theme = theme;
                s.notice(format!("theme: {name}"));
            }
            None => s.notice(format!("unknown theme {name:?} (try {})", THEME_NAMES.join(", "))),
        },
        Command::Names(on) => {
            let on = on.unwrap_or(!s.show_names);
            s.set_names(on);
        }
        Command::Line(n) => s.jump_to_line(n - 1),
        Command::Reload => s.reload(),
        Command::Write => s.write(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
