//! Theme system for consistent UI colors across dark and light modes.
//!
//! The palette follows the configured [`ThemeMode`]; `Auto` asks the OS for
//! its dark/light preference.

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeMode;

/// Semantic color theme for the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // Primary UI colors
    /// Primary color for borders, titles, and emphasis
    pub primary: Color,
    /// Accent color for focus states and key hints
    pub accent: Color,
    /// Success state color
    pub success: Color,
    /// Error state color
    pub error: Color,
    /// Warning state color, also used while loading
    pub warning: Color,

    // Text hierarchy
    /// Primary text content color
    pub text: Color,
    /// Secondary text color for file paths and labels
    pub text_secondary: Color,
    /// Muted text color for line numbers and help text
    pub text_muted: Color,

    // Backgrounds
    /// Main background color
    pub background: Color,
    /// Background of the selected hit
    pub highlight_bg: Color,

    // Matches
    /// Foreground of matched text
    pub match_fg: Color,
    /// Background of matched text
    pub match_bg: Color,
}

impl Theme {
    /// Detects the OS theme and returns the appropriate Theme.
    #[must_use]
    pub fn detect() -> Self {
        match dark_light::detect() {
            Ok(dark_light::Mode::Light) => Self::light(),
            // Fall back to dark theme for dark mode, unspecified, or errors
            Ok(dark_light::Mode::Dark | dark_light::Mode::Unspecified) | Err(_) => Self::dark(),
        }
    }

    /// Resolves the configured mode into a palette.
    #[must_use]
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Auto => Self::detect(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Palette for dark terminal backgrounds.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            accent: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,

            text: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,

            background: Color::Black,
            highlight_bg: Color::Rgb(40, 40, 60),

            match_fg: Color::Black,
            match_bg: Color::Yellow,
        }
    }

    /// Palette for light terminal backgrounds.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::Blue,
            accent: Color::Rgb(180, 100, 0), // Dark orange for visibility
            success: Color::Rgb(0, 128, 0),
            error: Color::Red,
            warning: Color::Rgb(200, 100, 0),

            text: Color::Black,
            text_secondary: Color::Rgb(60, 60, 60),
            text_muted: Color::Gray,

            background: Color::White,
            highlight_bg: Color::Rgb(220, 230, 245),

            match_fg: Color::Black,
            match_bg: Color::Rgb(255, 220, 120),
        }
    }

    /// Style of matched text.
    #[must_use]
    pub fn match_style(&self) -> Style {
        Style::default()
            .fg(self.match_fg)
            .bg(self.match_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Style of a border, accented when focused.
    #[must_use]
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.primary)
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_dark() {
        let theme = Theme::dark();
        assert_eq!(theme.primary, Color::Cyan);
        assert_eq!(theme.background, Color::Black);
        assert_eq!(theme.text, Color::White);
        assert_eq!(theme.accent, Color::Yellow);
    }

    #[test]
    fn test_theme_light() {
        let theme = Theme::light();
        assert_eq!(theme.text, Color::Black);
        assert_eq!(theme.background, Color::White);
        // Yellow is too bright for a light background
        assert_ne!(theme.accent, Color::Yellow);
    }

    #[test]
    fn test_theme_from_explicit_mode() {
        assert_eq!(Theme::from_mode(ThemeMode::Dark), Theme::dark());
        assert_eq!(Theme::from_mode(ThemeMode::Light), Theme::light());
    }

    #[test]
    fn test_match_style_stands_out() {
        let theme = Theme::dark();
        let style = theme.match_style();
        assert_eq!(style.bg, Some(theme.match_bg));
        assert_ne!(theme.match_bg, theme.background);
        assert_ne!(theme.border_style(true), theme.border_style(false));
    }

    #[test]
    fn test_theme_detect() {
        let theme = Theme::detect();
        assert!(theme == Theme::dark() || theme == Theme::light());
    }
}
