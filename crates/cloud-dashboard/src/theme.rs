//! Color themes.

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;

use crate::error::DashboardError;

/// Name of a built-in theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeName {
    /// Terminal default colors.
    #[default]
    Default,
    /// For dark terminal backgrounds.
    Dark,
}

impl FromStr for ThemeName {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "dark" => Ok(Self::Dark),
            _ => Err(DashboardError::InvalidTheme(s.to_string())),
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// Colors used by the dashboard widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Titles and tab highlight.
    pub accent: Color,
    /// Regular text.
    pub text: Color,
    /// Secondary text such as ages and help.
    pub muted: Color,
    /// Healthy values.
    pub ok: Color,
    /// In-progress values.
    pub warn: Color,
    /// Failures.
    pub error: Color,
    /// Gauge bars.
    pub gauge: Color,
    /// Selected tree row background.
    pub selection: Color,
}

impl Theme {
    /// Colors of a built-in theme.
    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self {
                accent: Color::Cyan,
                text: Color::Reset,
                muted: Color::Gray,
                ok: Color::Green,
                warn: Color::Yellow,
                error: Color::Red,
                gauge: Color::Blue,
                selection: Color::DarkGray,
            },
            ThemeName::Dark => Self {
                accent: Color::LightCyan,
                text: Color::White,
                muted: Color::DarkGray,
                ok: Color::LightGreen,
                warn: Color::LightYellow,
                error: Color::LightRed,
                gauge: Color::LightBlue,
                selection: Color::Rgb(48, 48, 64),
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::named(ThemeName::Default)
    }
}
