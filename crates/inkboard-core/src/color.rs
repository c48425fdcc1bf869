//! RGB colors parsed from and serialized to hex strings.

use crate::config::ConfigError;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque RGB color (8 bits per channel).
///
/// Serialized as a `#rrggbb` string so tool configuration files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or the `#rgb` shorthand. The leading `#` is optional.
    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let digits = s.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match digits.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
                Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                // Each shorthand digit expands to a doubled pair: "f" -> "ff".
                let channel = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::new(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for RgbColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RgbColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for RgbColor {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<RgbColor> for String {
    fn from(color: RgbColor) -> Self {
        color.to_hex()
    }
}

impl From<RgbColor> for Color {
    fn from(color: RgbColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, 255)
    }
}

impl From<Color> for RgbColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_form() {
        let color = RgbColor::from_hex("#1E90ff").unwrap();
        assert_eq!(color, RgbColor::new(0x1e, 0x90, 0xff));
    }

    #[test]
    fn test_parse_shorthand() {
        let color: RgbColor = "#f80".parse().unwrap();
        assert_eq!(color, RgbColor::new(0xff, 0x88, 0x00));
    }

    #[test]
    fn test_parse_without_hash() {
        assert_eq!(RgbColor::from_hex("000000").unwrap(), RgbColor::BLACK);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(RgbColor::from_hex("#12345").is_err());
        assert!(RgbColor::from_hex("#gg0000").is_err());
        assert!(RgbColor::from_hex("red").is_err());
        assert!(RgbColor::from_hex("").is_err());
    }

    #[test]
    fn test_hex_output() {
        assert_eq!(RgbColor::new(255, 0, 16).to_hex(), "#ff0010");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&RgbColor::WHITE).unwrap();
        assert_eq!(json, "\"#ffffff\"");

        let back: RgbColor = serde_json::from_str("\"#0af\"").unwrap();
        assert_eq!(back, RgbColor::new(0x00, 0xaa, 0xff));

        assert!(serde_json::from_str::<RgbColor>("\"nope\"").is_err());
    }

    #[test]
    fn test_peniko_conversion() {
        let color: Color = RgbColor::new(10, 20, 30).into();
        let rgba = color.to_rgba8();
        assert_eq!((rgba.r, rgba.g, rgba.b, rgba.a), (10, 20, 30, 255));
    }
}
