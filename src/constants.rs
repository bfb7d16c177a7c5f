//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and version information.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Code Search";

/// The binary name of the application (used in help text and paths).
pub const APP_BINARY_NAME: &str = "codesearch";

/// The application version from Cargo.toml.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
