//! Colors, glyphs and shared styles for the Taskdesk screens.

use ratatui::style::{Color, Modifier, Style};

/// Resolved colors, based on the Kanagawa Wave palette.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub bg_popup: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub error: Color,
    pub peach: Color,
}

impl Palette {
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            bg_dark: Color::Rgb(22, 22, 29),
            bg_panel: Color::Rgb(31, 31, 40),
            bg_highlight: Color::Rgb(42, 42, 55),
            bg_popup: Color::Rgb(54, 54, 70),
            bg_border: Color::Rgb(84, 84, 109),
            text_primary: Color::Rgb(220, 215, 186),
            text_secondary: Color::Rgb(200, 192, 147),
            text_muted: Color::Rgb(114, 113, 105),
            primary: Color::Rgb(149, 127, 184),
            accent: Color::Rgb(127, 180, 202),
            success: Color::Rgb(152, 187, 108),
            error: Color::Rgb(255, 93, 98),
            peach: Color::Rgb(255, 160, 102),
        }
    }
}

/// Markers drawn around table headers, rows, toasts and masked input.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub sort_asc: &'static str,
    pub sort_desc: &'static str,
    pub sort_none: &'static str,
    pub selected: &'static str,
    pub success: &'static str,
    pub error: &'static str,
    pub mask: char,
    pub separator: &'static str,
}

const UNICODE_GLYPHS: Glyphs = Glyphs {
    sort_asc: "↑",
    sort_desc: "↓",
    sort_none: "↕",
    selected: "▸",
    success: "✓",
    error: "✗",
    mask: '•',
    separator: "│",
};

const ASCII_GLYPHS: Glyphs = Glyphs {
    sort_asc: "^",
    sort_desc: "v",
    sort_none: "-",
    selected: ">",
    success: "OK",
    error: "!!",
    mask: '*',
    separator: "|",
};

#[must_use]
pub fn glyphs(ascii_only: bool) -> Glyphs {
    if ascii_only { ASCII_GLYPHS } else { UNICODE_GLYPHS }
}

pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::new().fg(palette.text_primary).add_modifier(Modifier::BOLD)
    }

    /// Focused panels and inputs get the primary color.
    #[must_use]
    pub fn border(palette: &Palette, focused: bool) -> Style {
        Style::new().fg(if focused { palette.primary } else { palette.bg_border })
    }

    #[must_use]
    pub fn label(palette: &Palette) -> Style {
        Style::new().fg(palette.text_secondary)
    }

    #[must_use]
    pub fn field_error(palette: &Palette) -> Style {
        Style::new().fg(palette.error)
    }

    /// Pager and form buttons. Disabled buttons are dimmed.
    #[must_use]
    pub fn button(palette: &Palette, enabled: bool) -> Style {
        if enabled {
            Style::new().fg(palette.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(palette.text_muted).add_modifier(Modifier::DIM)
        }
    }

    #[must_use]
    pub fn destructive(palette: &Palette) -> Style {
        Style::new().fg(palette.error).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::new().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::new().fg(palette.peach).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::glyphs;

    #[test]
    fn ascii_glyphs_are_ascii() {
        let g = glyphs(true);
        for s in [
            g.sort_asc,
            g.sort_desc,
            g.sort_none,
            g.selected,
            g.success,
            g.error,
            g.separator,
        ] {
            assert!(s.is_ascii(), "{s:?} is not ascii");
        }
        assert!(g.mask.is_ascii());
    }

    #[test]
    fn unicode_mask_is_single_column() {
        use unicode_width::UnicodeWidthChar;
        assert_eq!(glyphs(false).mask.width(), Some(1));
    }
}
