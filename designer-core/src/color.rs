//! CSS-style color strings.
//!
//! The element model keeps colors as the strings a host UI hands it
//! (`"#8B5CF6"`, `"#fff"`, `"transparent"`). This module turns them into
//! straight (non-premultiplied) RGBA for painting.

use crate::{EditorError, EditorResult};

/// A straight-alpha RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    /// Create a color from channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a color string.
    ///
    /// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `transparent` and
    /// `none`. Returns `Ok(None)` for `none` and the empty string, meaning
    /// "do not paint".
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidColor`] for anything else.
    pub fn parse(input: &str) -> EditorResult<Option<Self>> {
        let s = input.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Some(Self::TRANSPARENT));
        }

        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| EditorError::InvalidColor(input.to_string()))?;
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).and_then(|d| u8::try_from(d).ok()))
            .collect::<Option<_>>()
            .ok_or_else(|| EditorError::InvalidColor(input.to_string()))?;

        let color = match digits.as_slice() {
            [r, g, b] => Self::new(r * 17, g * 17, b * 17, 255),
            [r, g, b, a] => Self::new(r * 17, g * 17, b * 17, a * 17),
            [r1, r2, g1, g2, b1, b2] => Self::new(r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, 255),
            [r1, r2, g1, g2, b1, b2, a1, a2] => {
                Self::new(r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, a1 * 16 + a2)
            }
            _ => return Err(EditorError::InvalidColor(input.to_string())),
        };
        Ok(Some(color))
    }

    /// Parse leniently: unparseable input is logged and treated as "no paint".
    #[must_use]
    pub fn parse_or_none(input: &str) -> Option<Self> {
        match Self::parse(input) {
            Ok(color) => color,
            Err(e) => {
                tracing::debug!("{e}; skipping paint");
                None
            }
        }
    }

    /// Format as `#rrggbb` (or `#rrggbbaa` when not opaque).
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}
