//! RGB colors as they appear in SLD documents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::StyleError;

/// An opaque 8-bit RGB color.
///
/// Parsed from `#rrggbb` or `#rgb` (the `#` is optional, hex digits are
/// case-insensitive) and always written back as lowercase `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string.
    pub fn from_hex(hex: &str) -> Result<Self, StyleError> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let invalid = || StyleError::InvalidRamp(format!("'{}' is not an RGB hex color", hex));

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match digits.len() {
            6 => {
                let r = u8::from_str_radix(&digits[0..2], 16).map_err(|_| invalid())?;
                let g = u8::from_str_radix(&digits[2..4], 16).map_err(|_| invalid())?;
                let b = u8::from_str_radix(&digits[4..6], 16).map_err(|_| invalid())?;
                Ok(Self::new(r, g, b))
            }
            3 => {
                let expand = |i: usize| -> Result<u8, StyleError> {
                    let v = u8::from_str_radix(&digits[i..i + 1], 16).map_err(|_| invalid())?;
                    Ok(v * 17)
                };
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Per-channel linear interpolation towards `other`, rounded half-up.
    ///
    /// `t` is clamped to `[0, 1]`; `t == 0` returns `self` and `t == 1`
    /// returns `other` exactly.
    pub fn lerp(&self, other: &Rgb, t: f64) -> Rgb {
        if t <= 0.0 || t.is_nan() {
            return *self;
        }
        if t >= 1.0 {
            return *other;
        }

        let channel = |a: u8, b: u8| -> u8 {
            let v = a as f64 + (b as f64 - a as f64) * t;
            (v + 0.5).floor().clamp(0.0, 255.0) as u8
        };

        Rgb::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::from_hex("#FF5500").unwrap(), Rgb::new(255, 85, 0));
        assert_eq!(Rgb::from_hex("3579b1").unwrap(), Rgb::new(0x35, 0x79, 0xb1));
        assert_eq!(Rgb::from_hex("#fff").unwrap(), Rgb::WHITE);
        assert_eq!(Rgb::from_hex(" #000000 ").unwrap(), Rgb::BLACK);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "#", "#12345", "#1234567", "#gg0000", "red", "#ff00zz", "##ff0000", "###fff"] {
            let err = Rgb::from_hex(bad).unwrap_err();
            assert!(matches!(err, StyleError::InvalidRamp(_)), "{bad} should fail");
        }
    }

    #[test]
    fn test_hex_is_lowercase() {
        assert_eq!(Rgb::new(170, 187, 204).to_hex(), "#aabbcc");
        assert_eq!(Rgb::from_hex("#AABBCC").unwrap().to_string(), "#aabbcc");
    }

    #[test]
    fn test_lerp_endpoints_exact() {
        let a = Rgb::new(10, 20, 30);
        let b = Rgb::new(200, 100, 0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, -3.0), a);
        assert_eq!(a.lerp(&b, 7.0), b);
    }

    #[test]
    fn test_lerp_rounds_half_up() {
        // 0 + 255 * 0.5 = 127.5 -> 128
        let mid = Rgb::BLACK.lerp(&Rgb::WHITE, 0.5);
        assert_eq!(mid, Rgb::new(128, 128, 128));

        // 255 -> 0 at 0.5 = 127.5 -> 128 as well
        let mid = Rgb::WHITE.lerp(&Rgb::BLACK, 0.5);
        assert_eq!(mid, Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(255, 0, 0)).unwrap();
        assert_eq!(json, "\"#ff0000\"");

        let back: Rgb = serde_json::from_str("\"#00FF00\"").unwrap();
        assert_eq!(back, Rgb::new(0, 255, 0));

        assert!(serde_json::from_str::<Rgb>("\"nope\"").is_err());
    }
}
