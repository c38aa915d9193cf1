//! Color representation

use std::fmt;

/// Color representation
///
/// Mirrors the ways an XLSX file can name a color: explicit ARGB, an index
/// into the theme palette (with tint), or an index into the legacy palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Automatic/default color
    #[default]
    Auto,

    /// RGB color (no alpha)
    Rgb { r: u8, g: u8, b: u8 },

    /// ARGB color with alpha channel
    Argb { a: u8, r: u8, g: u8, b: u8 },

    /// Theme color with tint
    Theme {
        /// Theme color index (0 = Background 1, 1 = Text 1, 4-9 = Accents)
        index: u8,
        /// Tint in millionths (-1_000_000 to 1_000_000)
        tint: i32,
    },

    /// Indexed color (legacy Excel palette)
    Indexed(u8),
}

impl Color {
    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Create an ARGB color
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color::Argb { a, r, g, b }
    }

    /// Create a theme color from the tint as written in XLSX (e.g. `-0.25`)
    pub fn theme(index: u8, tint: f64) -> Self {
        Color::Theme {
            index,
            tint: (tint.clamp(-1.0, 1.0) * 1_000_000.0).round() as i32,
        }
    }

    /// Tint as a float, `None` for non-theme colors
    pub fn tint(&self) -> Option<f64> {
        match self {
            Color::Theme { tint, .. } => Some(*tint as f64 / 1_000_000.0),
            _ => None,
        }
    }

    /// Create from a hex string (e.g., "#03FDFD", "03fdfd" or "FF03FDFD")
    ///
    /// Fully opaque ARGB values come back as [`Color::Rgb`], so a color
    /// survives being written as ARGB and read again.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color::Rgb { r, g, b })
            }
            8 => {
                let a = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let r = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let g = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let b = u8::from_str_radix(&hex[6..8], 16).ok()?;
                if a == 0xFF {
                    Some(Color::Rgb { r, g, b })
                } else {
                    Some(Color::Argb { a, r, g, b })
                }
            }
            _ => None,
        }
    }

    /// ARGB hex string as written in an XLSX `rgb` attribute
    ///
    /// Returns `None` for colors that are not expressed as RGB.
    pub fn to_argb_hex(&self) -> Option<String> {
        match self {
            Color::Rgb { r, g, b } => Some(format!("FF{:02X}{:02X}{:02X}", r, g, b)),
            Color::Argb { a, r, g, b } => Some(format!("{:02X}{:02X}{:02X}{:02X}", a, r, g, b)),
            _ => None,
        }
    }

    /// Check if color is automatic/default
    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }

    /// Default highlight for reconciled names
    pub const TEAL: Color = Color::Rgb {
        r: 0x03,
        g: 0xFD,
        b: 0xFD,
    };
    pub const BLACK: Color = Color::Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => write!(f, "auto"),
            Color::Rgb { r, g, b } => write!(f, "#{:02X}{:02X}{:02X}", r, g, b),
            Color::Argb { a, r, g, b } => write!(f, "#{:02X}{:02X}{:02X}{:02X}", a, r, g, b),
            Color::Theme { index, .. } => match self.tint() {
                Some(t) if t != 0.0 => write!(f, "theme({}, {})", index, t),
                _ => write!(f, "theme({})", index),
            },
            Color::Indexed(i) => write!(f, "indexed({})", i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("03fdfd"), Some(Color::TEAL));
        assert_eq!(Color::from_hex("#03FDFD"), Some(Color::TEAL));
        assert_eq!(
            Color::from_hex("80FFFFFF"),
            Some(Color::argb(128, 255, 255, 255))
        );
        assert_eq!(Color::from_hex("FF03FDFD"), Some(Color::TEAL));
        assert_eq!(Color::from_hex("teal"), None);
        assert_eq!(Color::from_hex("é3FDFD"), None);
    }

    #[test]
    fn test_to_argb_hex() {
        assert_eq!(Color::TEAL.to_argb_hex().as_deref(), Some("FF03FDFD"));
        assert_eq!(Color::Indexed(64).to_argb_hex(), None);
    }

    #[test]
    fn test_theme_tint_round_trip() {
        let color = Color::theme(4, -0.249977111117893);
        assert_eq!(color.tint(), Some(-0.249977));
        assert_eq!(color.to_string(), "theme(4, -0.249977)");
    }
}
