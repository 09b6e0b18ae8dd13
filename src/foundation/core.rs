use std::fmt;

use serde::{Deserialize, Serialize};

pub use kurbo::Rect;

use crate::foundation::error::{AdError, AdResult};

/// Edge length, in pixels, of the square canvas every stage works on.
pub const CANVAS_SIZE: u32 = 1080;

/// Opaque sRGB color, serialized as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `#RRGGBBAA` (alpha dropped) or `#RGB`, case-insensitive, `#` optional.
    pub fn parse(s: &str) -> AdResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(AdError::validation(format!("invalid hex color \"{s}\"")));
        }

        fn hex_byte(pair: &str) -> AdResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| AdError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        match s.len() {
            3 => {
                let r = hex_byte(&s[0..1].repeat(2))?;
                let g = hex_byte(&s[1..2].repeat(2))?;
                let b = hex_byte(&s[2..3].repeat(2))?;
                Ok(Self::rgb(r, g, b))
            }
            6 | 8 => {
                let r = hex_byte(&s[0..2])?;
                let g = hex_byte(&s[2..4])?;
                let b = hex_byte(&s[4..6])?;
                Ok(Self::rgb(r, g, b))
            }
            _ => Err(AdError::validation(
                "hex color must be #RGB, #RRGGBB or #RRGGBBAA (case-insensitive)",
            )),
        }
    }

    /// Move each channel toward white by `amount` (0..1).
    pub fn lighten(self, amount: f64) -> Self {
        let t = amount.clamp(0.0, 1.0);
        let ch = |c: u8| -> u8 { (f64::from(c) + (255.0 - f64::from(c)) * t).round() as u8 };
        Self::rgb(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Scale each channel toward black by `amount` (0..1).
    pub fn darken(self, amount: f64) -> Self {
        let t = 1.0 - amount.clamp(0.0, 1.0);
        let ch = |c: u8| -> u8 { (f64::from(c) * t).round() as u8 };
        Self::rgb(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Relative luminance in 0..1 (Rec. 709 weights on gamma-encoded values).
    pub fn luminance(self) -> f64 {
        (0.2126 * f64::from(self.r) + 0.7152 * f64::from(self.g) + 0.0722 * f64::from(self.b))
            / 255.0
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Axis-aligned pixel rectangle, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Zone {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.width),
            f64::from(self.y) + f64::from(self.height),
        )
    }

    /// `true` when the zone has positive extent and lies fully inside a `size`×`size` canvas.
    pub fn fits_canvas(self, size: u32) -> bool {
        let canvas = canvas_rect(size);
        let r = self.to_rect();
        self.width > 0 && self.height > 0 && canvas.intersect(r) == r
    }
}

pub fn canvas_rect(size: u32) -> Rect {
    Rect::new(0.0, 0.0, f64::from(size), f64::from(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(
            HexColor::parse("#ff0000").unwrap(),
            HexColor::rgb(255, 0, 0)
        );
        assert_eq!(HexColor::parse("0A0A0F").unwrap(), HexColor::rgb(10, 10, 15));
        assert_eq!(HexColor::parse("#0f0").unwrap(), HexColor::rgb(0, 255, 0));
        assert_eq!(
            HexColor::parse("#0000ff80").unwrap(),
            HexColor::rgb(0, 0, 255)
        );
        assert!(HexColor::parse("#12345").is_err());
        assert!(HexColor::parse("#zzzzzz").is_err());
        assert!(HexColor::parse("#ÿÿÿ").is_err());
    }

    #[test]
    fn serde_uses_uppercase_hex_string() {
        let c: HexColor = serde_json::from_value(json!("#ff00ff")).unwrap();
        assert_eq!(serde_json::to_value(c).unwrap(), json!("#FF00FF"));
    }

    #[test]
    fn lighten_and_darken_move_toward_extremes() {
        let c = HexColor::rgb(100, 100, 100);
        assert_eq!(c.lighten(1.0), HexColor::WHITE);
        assert_eq!(c.darken(1.0), HexColor::BLACK);
        assert_eq!(c.lighten(0.0), c);
        assert!(c.lighten(0.5).r > c.r);
    }

    #[test]
    fn zone_fits_canvas_checks_bounds_and_extent() {
        assert!(Zone::new(0, 0, 1080, 1080).fits_canvas(CANVAS_SIZE));
        assert!(Zone::new(100, 900, 200, 64).fits_canvas(CANVAS_SIZE));
        assert!(!Zone::new(1000, 900, 200, 64).fits_canvas(CANVAS_SIZE));
        assert!(!Zone::new(10, 10, 0, 64).fits_canvas(CANVAS_SIZE));
    }
}
