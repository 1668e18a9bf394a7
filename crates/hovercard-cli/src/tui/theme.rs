//! Panel color handling
//!
//! The persisted theme stores hex strings; this module resolves them to
//! ratatui colors and carries the preset palettes offered on the Colors tab.

use ratatui::style::Color;

use hovercard_core::storage::PanelTheme;

/// Resolved ratatui colors for the current panel theme
#[derive(Debug, Clone, Copy)]
pub struct PanelPalette {
    pub header_bg: Color,
    pub header_text: Color,
    pub body_bg: Color,
    pub body_text: Color,
}

impl PanelPalette {
    /// Resolve a stored theme. Fields that fail to parse fall back to the
    /// corresponding default color so one bad field never blanks the panel.
    pub fn resolve(theme: &PanelTheme) -> Self {
        let defaults = PanelTheme::default();
        let field = |value: &str, fallback: &str| {
            parse_hex(value)
                .or_else(|| parse_hex(fallback))
                .unwrap_or(Color::Reset)
        };

        Self {
            header_bg: field(&theme.header_bg, &defaults.header_bg),
            header_text: field(&theme.header_text, &defaults.header_text),
            body_bg: field(&theme.body_bg, &defaults.body_bg),
            body_text: field(&theme.body_text, &defaults.body_text),
        }
    }
}

/// Parse a `#RRGGBB` hex string
pub fn parse_hex(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Named header color preset (background + matching text color)
#[derive(Debug, Clone, Copy)]
pub struct ColorPreset {
    pub name: &'static str,
    pub bg: &'static str,
    pub text: &'static str,
}

/// Header presets offered on the Colors tab
pub const HEADER_PRESETS: [ColorPreset; 5] = [
    ColorPreset {
        name: "Red",
        bg: "#EF4444",
        text: "#FFFFFF",
    },
    ColorPreset {
        name: "Blue",
        bg: "#3B82F6",
        text: "#FFFFFF",
    },
    ColorPreset {
        name: "Green",
        bg: "#10B981",
        text: "#FFFFFF",
    },
    ColorPreset {
        name: "Black",
        bg: "#1F2937",
        text: "#FFFFFF",
    },
    ColorPreset {
        name: "White",
        bg: "#FFFFFF",
        text: "#1F2937",
    },
];

/// Body presets offered on the Colors tab
pub const BODY_PRESETS: [ColorPreset; 3] = [
    ColorPreset {
        name: "Light",
        bg: "#FFFFFF",
        text: "#374151",
    },
    ColorPreset {
        name: "Dark",
        bg: "#111827",
        text: "#E5E7EB",
    },
    ColorPreset {
        name: "Sepia",
        bg: "#F5F0E6",
        text: "#44403C",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#EF4444"), Some(Color::Rgb(0xEF, 0x44, 0x44)));
        assert_eq!(parse_hex("#ffffff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex("EF4444"), None);
        assert_eq!(parse_hex("#EF44"), None);
        assert_eq!(parse_hex("#GG4444"), None);
    }

    #[test]
    fn test_resolve_falls_back_per_field() {
        let theme = PanelTheme {
            header_bg: "not-a-color".to_string(),
            ..PanelTheme::default()
        };
        let palette = PanelPalette::resolve(&theme);

        // Bad field falls back to the default header red
        assert_eq!(palette.header_bg, Color::Rgb(0xEF, 0x44, 0x44));
        assert_eq!(palette.body_bg, Color::Rgb(0xFF, 0xFF, 0xFF));
    }
}
