use ratatui::style::{Color, Modifier, Style};

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub cyan: Color,
    pub border: Color,
    pub selection_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x1B, 0x1D, 0x23),
            text: Color::Rgb(0xC8, 0xCC, 0xD4),
            text_bright: Color::Rgb(0xF2, 0xF3, 0xF5),
            highlight: Color::Rgb(0xE5, 0xA8, 0x4B),
            dim: Color::Rgb(0x6B, 0x70, 0x80),
            cyan: Color::Rgb(0x5F, 0xB3, 0xC9),
            border: Color::Rgb(0x3A, 0x3F, 0x4B),
            selection_bg: Color::Rgb(0x2E, 0x34, 0x40),
            search_match_bg: Color::Rgb(0x8F, 0x7A, 0x3C),
            search_match_fg: Color::Rgb(0x1B, 0x1D, 0x23),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Theme from `[ui.colors]`, unknown slots and bad values ignored
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut theme.background,
                "text" => &mut theme.text,
                "text_bright" => &mut theme.text_bright,
                "highlight" => &mut theme.highlight,
                "dim" => &mut theme.dim,
                "cyan" => &mut theme.cyan,
                "border" => &mut theme.border,
                "selection_bg" => &mut theme.selection_bg,
                "search_match_bg" => &mut theme.search_match_bg,
                "search_match_fg" => &mut theme.search_match_fg,
                _ => continue,
            };
            *slot = color;
        }
        theme
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.dim).bg(self.background)
    }

    /// Checked items: struck through and dimmed
    pub fn done_item(&self) -> Style {
        self.dimmed().add_modifier(Modifier::CROSSED_OUT)
    }

    pub fn search_match(&self) -> Style {
        Style::default()
            .fg(self.search_match_fg)
            .bg(self.search_match_bg)
    }

    pub fn search_active(&self) -> Style {
        Style::default()
            .fg(self.search_match_fg)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }
}
