//! Input handler modules for different TUI contexts.

pub mod actions;
pub mod help;
pub mod main;

// Re-export handler functions
pub use actions::dispatch_action;
pub use help::handle_help_input;
pub use main::handle_main_input;
