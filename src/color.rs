use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// An 8-bit RGBA paint color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Paints `self` over `dst` at `alpha` opacity (source-over compositing).
    pub fn over(&self, dst: &Color, alpha: f64) -> Color {
        let sa = (self.a as f64 / 255f64) * alpha.clamp(0f64, 1f64);
        let da = dst.a as f64 / 255f64;

        let out_a = sa + da * (1f64 - sa);
        if out_a <= 0f64 {
            return Color::TRANSPARENT;
        }

        let f = |s: u8, d: u8| {
            let c = (s as f64 * sa + d as f64 * da * (1f64 - sa)) / out_a;
            c.round().clamp(0f64, 255f64) as u8
        };

        Color {
            r: f(self.r, dst.r),
            g: f(self.g, dst.g),
            b: f(self.b, dst.b),
            a: (out_a * 255f64).round() as u8,
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;

        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }

        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("Expected color to start with '#'")]
    MissingHash,

    #[error("Expected 3, 4, 6 or 8 hex digits, found {got}")]
    InvalidLength { got: usize },

    #[error("Invalid hex digit '{got}'")]
    InvalidDigit { got: char },
}

/// Parses CSS hex notation: `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [b'#', hex @ ..] = s.trim().as_bytes() else {
            return Err(ColorError::MissingHash);
        };

        let digit = |b: u8| -> Result<u8, ColorError> {
            (b as char)
                .to_digit(16)
                .map(|d| d as u8)
                .ok_or(ColorError::InvalidDigit { got: b as char })
        };

        let mut channels = [255u8; 4];

        match hex.len() {
            // each digit is doubled: `#abc` is `#aabbcc`
            3 | 4 => {
                for (channel, &b) in channels.iter_mut().zip(hex) {
                    *channel = digit(b)? * 0x11;
                }
            }
            6 | 8 => {
                for (channel, pair) in channels.iter_mut().zip(hex.chunks(2)) {
                    *channel = digit(pair[0])? << 4 | digit(pair[1])?;
                }
            }
            got => return Err(ColorError::InvalidLength { got }),
        }

        let [r, g, b, a] = channels;

        Ok(Color { r, g, b, a })
    }
}
