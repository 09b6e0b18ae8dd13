use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::HexColor,
    error::{AdError, AdResult},
};

/// Overall arrangement of product and copy on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutType {
    HeroProduct,
    FeatureCallouts,
    LeftHero,
    Lifestyle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductPosition {
    Center,
    Left,
    Right,
    Top,
    Bottom,
}

/// Region kept free of product so that copy can sit there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeSpaceZone {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Premium,
    Aggressive,
    Luxury,
    Minimal,
    Playful,
    Fresh,
    Energetic,
    Warm,
    Trustworthy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundType {
    DarkGradient,
    LightGradient,
    Solid,
    Studio,
    Lifestyle,
    Neon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lighting {
    Cinematic,
    Soft,
    Dramatic,
    Natural,
    Studio,
    Neon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Glow,
    Bokeh,
    Particles,
    LensFlare,
    SoftShadow,
    Reflection,
    Grain,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub product_position: ProductPosition,
    /// Share of the canvas edge the product should occupy, 0.2..=0.9.
    pub product_size_fraction: f64,
    pub negative_space_zone: NegativeSpaceZone,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub mood: Mood,
    pub background_type: BackgroundType,
    pub background_color_hex: HexColor,
    pub accent_color_hex: HexColor,
    pub lighting: Lighting,
    pub effects: BTreeSet<Effect>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: u32,
    /// CSS font weight, 100..=900.
    pub weight: u16,
    pub color: HexColor,
    pub shadow: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub headline: TextStyle,
    pub tagline: TextStyle,
    pub cta: TextStyle,
}

/// Style and composition decisions made once per request.
///
/// Every field is populated by construction; there is no partially-filled plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    pub layout_type: LayoutType,
    pub composition: Composition,
    pub style: Style,
    pub typography: Typography,
}

impl LayoutPlan {
    pub fn validate(&self) -> AdResult<()> {
        let f = self.composition.product_size_fraction;
        if !f.is_finite() || !(0.2..=0.9).contains(&f) {
            return Err(AdError::validation(format!(
                "product size fraction {f} outside 0.2..=0.9"
            )));
        }
        for (name, t) in [
            ("headline", &self.typography.headline),
            ("tagline", &self.typography.tagline),
            ("cta", &self.typography.cta),
        ] {
            if t.font_size == 0 {
                return Err(AdError::validation(format!("{name} font size must be > 0")));
            }
            if !(100..=900).contains(&t.weight) {
                return Err(AdError::validation(format!(
                    "{name} font weight {} outside 100..=900",
                    t.weight
                )));
            }
        }
        Ok(())
    }
}

impl LayoutType {
    pub fn describe(self) -> &'static str {
        match self {
            Self::HeroProduct => "single hero product shot, product dominant and centered",
            Self::FeatureCallouts => "product centered with open space around it for callouts",
            Self::LeftHero => "product on the left half, calm open area on the right",
            Self::Lifestyle => "product in a natural in-use lifestyle setting",
        }
    }
}

impl ProductPosition {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Center => "centered",
            Self::Left => "left of center",
            Self::Right => "right of center",
            Self::Top => "in the upper half",
            Self::Bottom => "in the lower half",
        }
    }
}

impl NegativeSpaceZone {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl Mood {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Premium => "premium, confident and polished",
            Self::Aggressive => "aggressive, high-contrast and intense",
            Self::Luxury => "luxurious, refined and exclusive",
            Self::Minimal => "minimal, airy and clean",
            Self::Playful => "playful, bright and friendly",
            Self::Fresh => "fresh, natural and appetizing",
            Self::Energetic => "energetic, dynamic and bold",
            Self::Warm => "warm, cozy and inviting",
            Self::Trustworthy => "calm, trustworthy and precise",
        }
    }
}

impl BackgroundType {
    pub fn describe(self) -> &'static str {
        match self {
            Self::DarkGradient => "dark smooth gradient backdrop",
            Self::LightGradient => "light soft gradient backdrop",
            Self::Solid => "seamless solid-color backdrop",
            Self::Studio => "professional photo studio sweep",
            Self::Lifestyle => "softly blurred real-world environment",
            Self::Neon => "dark backdrop with neon rim lighting",
        }
    }
}

impl Lighting {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Cinematic => "cinematic three-point lighting, key light from the left",
            Self::Soft => "soft diffused lighting without harsh shadows",
            Self::Dramatic => "dramatic low-key lighting with strong contrast",
            Self::Natural => "natural daylight",
            Self::Studio => "even studio softbox lighting",
            Self::Neon => "colored neon accent lighting",
        }
    }
}

impl Effect {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Glow => "subtle glow",
            Self::Bokeh => "background bokeh",
            Self::Particles => "floating light particles",
            Self::LensFlare => "gentle lens flare",
            Self::SoftShadow => "soft contact shadow under the product",
            Self::Reflection => "faint floor reflection",
            Self::Grain => "fine film grain",
        }
    }
}
