//! Colour theme for the subroll TUI.
//!
//! Themes are TOML files embedded in the binary via [`include_str!`], so the
//! application works without any files on disk. [`Theme::by_name`] resolves
//! the name stored in `[ui] theme` (or typed after `:theme`).
//!
//! # Colour assignment for logins
//!
//! Logins are hashed to a stable index into the palette so the same login
//! always gets the same colour, in the results list and the summary alike.

use config::{Config, File, FileFormat};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");
const GRUVBOX_DARK_THEME_SRC: &str = include_str!("themes/gruvbox_dark.toml");

/// Names accepted by [`Theme::by_name`], for help and error text.
pub const THEME_NAMES: &[&str] = &["default", "gruvbox"];

// ---------------------------------------------------------------------------
// Raw (serde) types mirroring the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    underlined: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        if let Some(c) = self.fg.as_deref().and_then(parse_color) {
            style = style.fg(c);
        }
        if let Some(c) = self.bg.as_deref().and_then(parse_color) {
            style = style.bg(c);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.underlined {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawSource {
    line_number: RawStyle,
    hit: RawStyle,
    error: RawStyle,
    placeholder: RawStyle,
    cursor: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawResults {
    selected: RawStyle,
    error: RawStyle,
    count: RawStyle,
    display: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawBorders {
    focused: RawStyle,
    command_bar: RawStyle,
    unfocused: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    highlight: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    bar: RawStyle,
    ok: RawStyle,
    error: RawStyle,
    notice: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawNames {
    palette: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    source: RawSource,
    results: RawResults,
    borders: RawBorders,
    search: RawSearch,
    status: RawStatus,
    names: RawNames,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Application colour theme.
///
/// All styles are pre-resolved ratatui [`Style`] values, so rendering never
/// parses colours.
#[derive(Debug, Clone)]
pub struct Theme {
    pub line_number: Style,
    /// First line of a block that produced a hit.
    pub source_hit: Style,
    /// Every line of a block that produced an error.
    pub source_error: Style,
    /// Injected placeholder lines.
    pub source_placeholder: Style,
    /// Background of the source-pane cursor line.
    pub source_cursor: Style,

    pub result_selected: Style,
    pub result_error: Style,
    pub result_count: Style,
    pub result_display: Style,

    pub border_focused: Style,
    pub border_command_bar: Style,
    pub border_unfocused: Style,

    /// Query matches inside summary rows.
    pub search_highlight: Style,

    pub status_bar: Style,
    pub status_ok: Style,
    pub status_error: Style,
    pub status_notice: Style,

    name_palette: Vec<Color>,
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed, which the theme tests rule
    /// out.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Load and parse the embedded Gruvbox Dark theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_gruvbox_dark() -> Self {
        Self::from_toml_str(GRUVBOX_DARK_THEME_SRC)
            .expect("embedded gruvbox dark theme must be valid TOML")
    }

    /// Resolve a theme by (case-insensitive) name; `None` for unknown names.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" => Some(Self::load_default()),
            "gruvbox" | "gruvbox_dark" | "gruvbox-dark" => Some(Self::load_gruvbox_dark()),
            _ => None,
        }
    }

    /// Parse a theme from a TOML string.
    ///
    /// Unknown keys are ignored; missing sections are an error.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            line_number: raw.source.line_number.into_style(),
            source_hit: raw.source.hit.into_style(),
            source_error: raw.source.error.into_style(),
            source_placeholder: raw.source.placeholder.into_style(),
            source_cursor: raw.source.cursor.into_style(),
            result_selected: raw.results.selected.into_style(),
            result_error: raw.results.error.into_style(),
            result_count: raw.results.count.into_style(),
            result_display: raw.results.display.into_style(),
            border_focused: raw.borders.focused.into_style(),
            border_command_bar: raw.borders.command_bar.into_style(),
            border_unfocused: raw.borders.unfocused.into_style(),
            search_highlight: raw.search.highlight.into_style(),
            status_bar: raw.status.bar.into_style(),
            status_ok: raw.status.ok.into_style(),
            status_error: raw.status.error.into_style(),
            status_notice: raw.status.notice.into_style(),
            name_palette: raw.names.palette.iter().filter_map(|s| parse_color(s)).collect(),
        })
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            self.border_focused
        } else {
            self.border_unfocused
        }
    }

    /// Stable colour for a login. The same login maps to the same colour
    /// within a session regardless of the order logins appear in.
    pub fn name_style(&self, login: &str) -> Style {
        if self.name_palette.is_empty() {
            return Style::default();
        }
        let idx = stable_hash(login) % self.name_palette.len();
        Style::default().fg(self.name_palette[idx])
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// djb2-style hash, stable across Rust versions and process restarts.
fn stable_hash(s: &str) -> usize {
    s.bytes()
        .fold(5381usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize))
}

/// Parse a colour name into a ratatui [`Color`].
///
/// Accepts named terminal colours (`red`, `dark_gray`, ...), hex `#rrggbb`,
/// and `indexed:N`.
fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "darkgray" | "dark_grey" | "darkgrey" => Some(Color::DarkGray),
        "light_red" => Some(Color::LightRed),
        "light_green" => Some(Color::LightGreen),
        "light_yellow" => Some(Color::LightYellow),
        "light_blue" => Some(Color::LightBlue),
        "light_magenta" => Some(Color::LightMagenta),
        "light_cyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(&s[1..3], 16).ok()?;
            let g = u8::from_str_radix(&s[3..5], 16).ok()?;
            let b = u8::from_str_radix(&s[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        s if s.starts_with("indexed:") => s["indexed:".len()..].parse().ok().map(Color::Indexed),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
