//! Pixel geometry for the text overlays.

pub mod defaults;
pub mod extractor;

use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::{HexColor, Zone},
    error::{AdError, AdResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn svg_anchor(self) -> &'static str {
        match self {
            Self::Left => "start",
            Self::Center => "middle",
            Self::Right => "end",
        }
    }
}

/// `x` is the anchor for `align`; `y` is the baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPlacement {
    pub x: u32,
    pub y: u32,
    pub max_width: u32,
    pub font_size: u32,
    pub color: HexColor,
    pub align: TextAlign,
}

/// Button rectangle; `x`, `y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaPlacement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub corner_radius: u32,
    pub background_color: HexColor,
}

impl CtaPlacement {
    pub fn zone(&self) -> Zone {
        Zone::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeZones {
    pub product: Zone,
    pub text: Zone,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateSet {
    pub headline: TextPlacement,
    pub tagline: Option<TextPlacement>,
    pub cta: CtaPlacement,
    pub safe_zones: SafeZones,
}

impl CoordinateSet {
    /// Check every invariant the compositor relies on for a `size`×`size` canvas.
    pub fn validate(&self, size: u32) -> AdResult<()> {
        let text = [("headline", Some(&self.headline)), ("tagline", self.tagline.as_ref())];
        for (name, placement) in text {
            let Some(p) = placement else {
                continue;
            };
            if p.x > size || p.y > size {
                return Err(AdError::geometry(format!(
                    "{name} anchor ({}, {}) outside 0..={size}",
                    p.x, p.y
                )));
            }
            if p.max_width == 0 || p.max_width > size {
                return Err(AdError::geometry(format!(
                    "{name} max width {} outside 1..={size}",
                    p.max_width
                )));
            }
            if p.font_size == 0 || p.font_size > size {
                return Err(AdError::geometry(format!(
                    "{name} font size {} outside 1..={size}",
                    p.font_size
                )));
            }
        }

        if !self.cta.zone().fits_canvas(size) {
            return Err(AdError::geometry(format!(
                "cta {:?} does not fit a {size}x{size} canvas",
                self.cta.zone()
            )));
        }
        for (name, zone) in [("product", self.safe_zones.product), ("text", self.safe_zones.text)] {
            if !zone.fits_canvas(size) {
                return Err(AdError::geometry(format!(
                    "{name} safe zone {zone:?} does not fit a {size}x{size} canvas"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        foundation::core::CANVAS_SIZE,
        plan::{
            copy::AdCopy,
            templates::{Industry, StyleTemplate},
        },
    };

    fn sample() -> CoordinateSet {
        let plan = StyleTemplate::for_industry(Industry::General).to_plan();
        defaults::default_coordinates(&plan, &AdCopy::new("Hi", Some("there".into()), "Go"))
    }

    #[test]
    fn defaults_validate() {
        sample().validate(CANVAS_SIZE).unwrap();
    }

    #[test]
    fn overflowing_cta_is_rejected() {
        let mut c = sample();
        c.cta.x = CANVAS_SIZE - 10;
        assert!(matches!(c.validate(CANVAS_SIZE), Err(AdError::Geometry(_))));
    }

    #[test]
    fn anchor_outside_canvas_is_rejected() {
        let mut c = sample();
        c.headline.y = CANVAS_SIZE + 1;
        assert!(c.validate(CANVAS_SIZE).is_err());

        let mut c = sample();
        if let Some(t) = c.tagline.as_mut() {
            t.font_size = 0;
        }
        assert!(c.validate(CANVAS_SIZE).is_err());
    }

    #[test]
    fn serializes_camel_case() {
        let v = serde_json::to_value(sample()).unwrap();
        assert!(v["headline"]["maxWidth"].is_u64());
        assert!(v["cta"]["cornerRadius"].is_u64());
        assert!(v["safeZones"]["product"]["width"].is_u64());
        assert_eq!(v["headline"]["align"], "center");
    }
}
