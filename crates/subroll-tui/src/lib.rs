//! subroll TUI: a ratatui shell around the extraction pipeline.
//!
//! The source pane shows the normalized paste; the results and users panes
//! list what was extracted; the filter narrows the users list. The open file
//! is watched and re-processed when it changes on disk.

pub mod app;
pub mod commands;
pub mod document;
pub mod event;
pub mod names;
pub mod theme;
pub mod watch;
pub mod widgets;

pub use app::{App, AppState};
pub use document::Document;

use std::sync::Arc;
use subroll_core::config::Config;

/// Open `doc` in the TUI and block until the user quits.
///
/// Display names are looked up from the start unless `[lookup] enabled` is
/// off in config.
pub fn run(doc: Document, config: Config) -> anyhow::Result<()> {
    let theme = theme::Theme::by_name(&config.ui.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.ui.theme, "unknown theme in config, using default");
        theme::Theme::load_default()
    });

    let names = if config.lookup.enabled {
        let client = subroll_lookup::IvrClient::from_config(&config.lookup);
        Some(names::NameLookups::new(Arc::new(client))?)
    } else {
        None
    };

    App::new(AppState::new(doc, config, theme, names)).run()
}
