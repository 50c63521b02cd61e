//! Terminal UI for cinedex.
//!
//! Uses `ratatui` + `crossterm` for rendering.

/// Movie browser: view-state controller, pure view and event loop.
pub mod browser;
