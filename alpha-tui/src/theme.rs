//! Terminal color tokens for the Alpha Terminal dashboard.
//!
//! Dark surface with a green accent, matching the web dashboard:
//! - **Accent**: terminal green (focus, highlights, the active section)
//! - **Positive / Negative**: gains and losses, bullish and bearish
//! - **Warning**: amber (mid-range recession odds, notices)
//! - **Muted**: slate (secondary text, hints)

use ratatui::style::{Color, Modifier, Style};

use alpha_core::Tone;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::terminal_green()
    }
}

impl Theme {
    pub const fn terminal_green() -> Self {
        Self {
            background: Color::Rgb(10, 12, 16),
            accent: Color::Rgb(51, 226, 154),
            positive: Color::Rgb(51, 226, 154),
            negative: Color::Rgb(255, 82, 82),
            warning: Color::Rgb(255, 183, 77),
            neutral: Color::Rgb(176, 190, 197),
            muted: Color::Rgb(100, 116, 139),
            text_primary: Color::White,
        }
    }

    /// Color for a formatter tone hint.
    pub fn tone_color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Positive => self.positive,
            Tone::Negative => self.negative,
            Tone::Neutral => self.text_primary,
            Tone::Accent => self.accent,
            Tone::Warning => self.warning,
        }
    }
}

const THEME: Theme = Theme::terminal_green();

pub fn accent() -> Style {
    Style::default().fg(THEME.accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(THEME.positive)
}

pub fn negative() -> Style {
    Style::default().fg(THEME.negative)
}

pub fn warning() -> Style {
    Style::default().fg(THEME.warning)
}

pub fn neutral() -> Style {
    Style::default().fg(THEME.neutral)
}

pub fn muted() -> Style {
    Style::default().fg(THEME.muted)
}

pub fn text() -> Style {
    Style::default().fg(THEME.text_primary)
}

pub fn tone(t: Tone) -> Style {
    Style::default().fg(THEME.tone_color(t))
}

pub fn selected_row() -> Style {
    Style::default().bg(Color::Rgb(30, 41, 59)).add_modifier(Modifier::BOLD)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}
