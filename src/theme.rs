//! Color palette for the zdetach TUI.
//!
//! A small fixed theme grouped into background neutrals, text shades, and a
//! handful of semantic accents. Everything renders against a dark base.
use ratatui::style::Color;

/// Palette used by the rendering code.
pub struct Theme {
    /// Primary background color for the canvas.
    pub base: Color,
    /// Darkest background shade, used behind the highlighted row.
    pub crust: Color,
    /// Muted border color for unfocused chrome.
    pub surface: Color,
    /// Muted line color for captions and separators.
    pub overlay: Color,
    /// Primary foreground text color.
    pub text: Color,
    /// Secondary text for low-emphasis content.
    pub subtext: Color,
    /// Accent for the search prompt and interactive highlights.
    pub sapphire: Color,
    /// Accent for titles.
    pub mauve: Color,
    /// Success/positive state color.
    pub green: Color,
    /// Warning/attention state color.
    pub yellow: Color,
    /// Error/danger state color.
    pub red: Color,
    /// Accent for the row highlight background.
    pub lavender: Color,
}

/// Construct a [`Color::Rgb`] from an 8-bit RGB triplet.
fn hex(rgb: (u8, u8, u8)) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// The application's palette.
pub fn theme() -> Theme {
    Theme {
        base: hex((0x1e, 0x1e, 0x2e)),
        crust: hex((0x11, 0x11, 0x1b)),
        surface: hex((0x45, 0x47, 0x5a)),
        overlay: hex((0x7f, 0x84, 0x9c)),
        text: hex((0xcd, 0xd6, 0xf4)),
        subtext: hex((0xa6, 0xad, 0xc8)),
        sapphire: hex((0x74, 0xc7, 0xec)),
        mauve: hex((0xcb, 0xa6, 0xf7)),
        green: hex((0xa6, 0xe3, 0xa1)),
        yellow: hex((0xf9, 0xe2, 0xaf)),
        red: hex((0xf3, 0x8b, 0xa8)),
        lavender: hex((0xb4, 0xbe, 0xfe)),
    }
}
