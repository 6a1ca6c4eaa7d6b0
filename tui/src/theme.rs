//! Color theme and glyphs for the Mediq TUI.
//!
//! A muted teal/slate palette by default with an optional high-contrast
//! override from config.

use ratatui::style::{Color, Modifier, Style};

mod colors {
    use super::Color;

    // === Backgrounds ===
    pub const BG_DARK: Color = Color::Rgb(18, 24, 28);
    pub const BG_PANEL: Color = Color::Rgb(26, 34, 40);
    pub const BG_HIGHLIGHT: Color = Color::Rgb(38, 50, 58);
    pub const BORDER: Color = Color::Rgb(62, 82, 92);

    // === Foregrounds ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(224, 230, 230);
    pub const TEXT_SECONDARY: Color = Color::Rgb(186, 196, 196);
    pub const TEXT_MUTED: Color = Color::Rgb(110, 126, 130);

    // === Accents ===
    pub const TEAL: Color = Color::Rgb(94, 186, 176);
    pub const BLUE: Color = Color::Rgb(108, 154, 212);
    pub const YELLOW: Color = Color::Rgb(224, 192, 128);
    pub const RED: Color = Color::Rgb(224, 108, 118);

    // === Semantic aliases ===
    pub const ACCENT: Color = TEAL;
    pub const USER: Color = BLUE;
    pub const ASSISTANT: Color = TEAL;
    pub const WARNING: Color = YELLOW;
    pub const ERROR: Color = RED;
    pub const LINK: Color = BLUE;
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub user: Color,
    pub assistant: Color,
    pub warning: Color,
    pub error: Color,
    pub link: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_highlight: colors::BG_HIGHLIGHT,
            border: colors::BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            accent: colors::ACCENT,
            user: colors::USER,
            assistant: colors::ASSISTANT,
            warning: colors::WARNING,
            error: colors::ERROR,
            link: colors::LINK,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_highlight: Color::DarkGray,
            border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::White,
            text_muted: Color::Gray,
            accent: Color::Cyan,
            user: Color::LightBlue,
            assistant: Color::Cyan,
            warning: Color::Yellow,
            error: Color::LightRed,
            link: Color::LightBlue,
        }
    }
}

/// Pick the palette for the current app settings.
#[must_use]
pub fn palette(high_contrast: bool) -> Palette {
    if high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn user_name(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.user)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn assistant_name(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.assistant)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn emphasis(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }
}

const SPINNER_FRAMES: [&str; 4] = ["·  ", "·· ", "···", "   "];

/// Typing-indicator frame for the given tick counter.
#[must_use]
pub fn spinner_frame(ticks: u64) -> &'static str {
    // ~8ms per tick; advance the dots every ~250ms.
    let index = (ticks / 32) as usize % SPINNER_FRAMES.len();
    SPINNER_FRAMES[index]
}
