//! RGBA colors with hex parsing
//!
//! Channels are stored as `f64` in `0.0..=1.0`. Hex strings follow the mobile
//! toolkit convention: `#RGB`, `#RRGGBB` and `#AARRGGBB` (alpha first).

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{Result, TweenError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Build a color from 8-bit channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f64 / 255.0,
            g as f64 / 255.0,
            b as f64 / 255.0,
            a as f64 / 255.0,
        )
    }

    /// Parse `#RGB`, `#RRGGBB` or `#AARRGGBB`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || TweenError::InvalidColor(hex.to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());

        match digits.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .map(|n| n * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, 255))
            }
            6 => Ok(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Ok(Self::from_rgba8(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
            _ => Err(invalid()),
        }
    }

    /// Channels as 8-bit values, rounded to nearest.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Hex string in `#RRGGBB` form, or `#AARRGGBB` when not opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", a, r, g, b)
        }
    }

    /// Clamp every channel into `0.0..=1.0`.
    pub fn clamped(&self) -> Self {
        Self::rgba(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::TRANSPARENT
    }
}

impl FromStr for Color {
    type Err = TweenError;

    fn from_str(s: &str) -> Result<Self> {
        Color::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit_hex() {
        let c = Color::from_hex("#9333EA").unwrap();
        assert_eq!(c.to_rgba8(), [0x93, 0x33, 0xEA, 0xFF]);
    }

    #[test]
    fn test_parse_short_hex() {
        let c = Color::from_hex("#F00").unwrap();
        assert_eq!(c, Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_parse_alpha_first_hex() {
        let c = Color::from_hex("#80FF0000").unwrap();
        assert_eq!(c.to_rgba8(), [0xFF, 0x00, 0x00, 0x80]);
    }

    #[test]
    fn test_reject_malformed_hex() {
        assert!(matches!(
            Color::from_hex("#12345"),
            Err(TweenError::InvalidColor(_))
        ));
        assert!(Color::from_hex("#GG0000").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn test_hex_display() {
        assert_eq!(Color::from_hex("#10b981").unwrap().to_string(), "#10B981");
        assert_eq!(Color::from_hex("#8010B981").unwrap().to_hex(), "#8010B981");
    }
}
