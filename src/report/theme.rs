//! Colour theme for text reports.
//!
//! Supports light and dark themes with automatic terminal detection, and a
//! plain theme that emits no escape sequences at all.

use std::fmt::Display;

use crossterm::style::{Color, Stylize};
use crossterm::tty::IsTty;
use serde::Deserialize;

/// When to colour the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colour when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

/// Colours used by the renderers.
///
/// Use [`Theme::for_mode()`] to pick a theme from a [`ColorMode`], or
/// [`Theme::dark()`]/[`Theme::light()`]/[`Theme::plain()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// False for the plain theme; every `paint` call is then a no-op.
    pub enabled: bool,
    /// Improvements and passed verdicts.
    pub good: Color,
    /// Regressions and failed verdicts.
    pub bad: Color,
    /// Unchanged values.
    pub neutral: Color,
    /// Titles and table headers.
    pub title: Color,
    pub warning: Color,
    /// Plot bars.
    pub accent: Color,
}

impl Theme {
    /// Theme for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            enabled: true,
            good: Color::Green,
            bad: Color::Red,
            neutral: Color::Grey,
            title: Color::White,
            warning: Color::Yellow,
            accent: Color::Cyan,
        }
    }

    /// Theme for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            enabled: true,
            good: Color::DarkGreen,
            bad: Color::DarkRed,
            neutral: Color::DarkGrey,
            title: Color::Black,
            warning: Color::DarkYellow,
            accent: Color::Blue,
        }
    }

    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::dark()
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn for_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Never => Self::plain(),
            ColorMode::Always => Self::auto_detect(),
            ColorMode::Auto if std::io::stdout().is_tty() => Self::auto_detect(),
            ColorMode::Auto => Self::plain(),
        }
    }

    /// Render `text` in `color`.
    pub fn paint(&self, text: impl Display, color: Color) -> String {
        if self.enabled {
            text.to_string().with(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// Render `text` in bold `color`.
    pub fn bold(&self, text: impl Display, color: Color) -> String {
        if self.enabled {
            text.to_string().with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Colour for a signed change, given whether an increase is an improvement.
    pub fn change_color(&self, change: f64, higher_is_better: bool) -> Color {
        if change == 0.0 || change.is_nan() {
            self.neutral
        } else if (change > 0.0) == higher_is_better {
            self.good
        } else {
            self.bad
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_theme_emits_no_escapes() {
        let theme = Theme::plain();
        assert_eq!(theme.paint("passed", theme.good), "passed");
        assert_eq!(theme.bold(42, theme.bad), "42");
    }

    #[test]
    fn test_dark_theme_emits_escapes() {
        let theme = Theme::dark();
        let painted = theme.paint("failed", theme.bad);
        assert!(painted.contains("failed"));
        assert!(painted.contains('\u{1b}'));
    }

    #[test]
    fn test_change_color() {
        let theme = Theme::dark();
        assert_eq!(theme.change_color(0.0, false), theme.neutral);
        assert_eq!(theme.change_color(1.5, false), theme.bad);
        assert_eq!(theme.change_color(-1.5, false), theme.good);
        assert_eq!(theme.change_color(1.5, true), theme.good);
        assert_eq!(theme.change_color(-1.5, true), theme.bad);
    }

    #[test]
    fn test_never_mode_is_plain() {
        assert!(!Theme::for_mode(ColorMode::Never).enabled);
    }
}
