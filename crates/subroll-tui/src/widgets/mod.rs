//! Ratatui widgets for the subroll TUI.

pub mod command_bar;
pub mod help;
pub mod query_bar;
pub mod result_list;
pub mod source_view;
pub mod status_bar;
pub mod summary_list;
