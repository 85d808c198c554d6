//! subroll: pull Twitch logins out of pasted sub/gift notifications.
//!
//! The binary has two faces:
//!
//! ```text
//! subroll FILE              ──► subroll-tui (interactive)
//! subroll --headless FILE|- ──► headless ──► report ──► stdout
//! ```
//!
//! Both run the same `subroll_core` pipeline. This crate only holds the
//! headless runner and its report renderers, exposed so the integration
//! harnesses can drive them directly.

pub mod headless;
pub mod report;

pub use headless::{HeadlessOptions, OutputFormat};
pub use report::Report;
