//! Code Search TUI Library
//!
//! This library provides the keyboard-driven terminal front end for a
//! codesearch backend: multi-key shortcut recognition, hit navigation over
//! search results, the HTTP client, and the Ratatui interface.

// Module declarations
pub mod client;
pub mod config;
pub mod constants;
pub mod keyboard;
pub mod logging;
pub mod search;
pub mod shortcuts;
pub mod tui;
