use serde::{Deserialize, Serialize};

use crate::{
    foundation::core::HexColor,
    plan::model::{
        BackgroundType, Composition, Effect, LayoutPlan, LayoutType, Lighting, Mood,
        NegativeSpaceZone, ProductPosition, Style, TextStyle, Typography,
    },
};

/// Industry vertical used to pick a style template. Unknown keys resolve to `General`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    #[default]
    General,
    Gaming,
    Tech,
    Fashion,
    Beauty,
    Food,
    Fitness,
    Home,
    Jewelry,
    Kids,
}

impl Industry {
    pub const ALL: [Self; 10] = [
        Self::General,
        Self::Gaming,
        Self::Tech,
        Self::Fashion,
        Self::Beauty,
        Self::Food,
        Self::Fitness,
        Self::Home,
        Self::Jewelry,
        Self::Kids,
    ];

    pub fn from_key(key: Option<&str>) -> Self {
        let Some(key) = key else {
            return Self::General;
        };
        let key = key.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "gaming" | "esports" | "gamer" | "games" => Self::Gaming,
            "tech" | "technology" | "electronics" | "gadgets" | "software" => Self::Tech,
            "fashion" | "apparel" | "clothing" | "streetwear" | "shoes" => Self::Fashion,
            "beauty" | "cosmetics" | "skincare" | "makeup" | "fragrance" => Self::Beauty,
            "food" | "beverage" | "drinks" | "restaurant" | "food_beverage" => Self::Food,
            "fitness" | "sports" | "supplements" | "gym" => Self::Fitness,
            "home" | "furniture" | "home_decor" | "interior" | "living" => Self::Home,
            "jewelry" | "jewellery" | "luxury" | "watches" => Self::Jewelry,
            "kids" | "toys" | "baby" | "toy" => Self::Kids,
            _ => Self::General,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Gaming => "gaming",
            Self::Tech => "tech",
            Self::Fashion => "fashion",
            Self::Beauty => "beauty",
            Self::Food => "food",
            Self::Fitness => "fitness",
            Self::Home => "home",
            Self::Jewelry => "jewelry",
            Self::Kids => "kids",
        }
    }
}

/// Static style defaults for one industry.
#[derive(Clone, Copy, Debug)]
pub struct StyleTemplate {
    pub layout_type: LayoutType,
    pub product_position: ProductPosition,
    pub product_size_fraction: f64,
    pub negative_space_zone: NegativeSpaceZone,
    pub mood: Mood,
    pub background_type: BackgroundType,
    pub background_color: HexColor,
    pub accent_color: HexColor,
    pub lighting: Lighting,
    pub effects: &'static [Effect],
    pub headline: TextStyle,
    pub tagline: TextStyle,
    pub cta: TextStyle,
    pub default_cta: &'static str,
}

impl StyleTemplate {
    pub fn for_industry(industry: Industry) -> &'static Self {
        match industry {
            Industry::General => &GENERAL,
            Industry::Gaming => &GAMING,
            Industry::Tech => &TECH,
            Industry::Fashion => &FASHION,
            Industry::Beauty => &BEAUTY,
            Industry::Food => &FOOD,
            Industry::Fitness => &FITNESS,
            Industry::Home => &HOME,
            Industry::Jewelry => &JEWELRY,
            Industry::Kids => &KIDS,
        }
    }

    pub fn to_plan(&self) -> LayoutPlan {
        LayoutPlan {
            layout_type: self.layout_type,
            composition: Composition {
                product_position: self.product_position,
                product_size_fraction: self.product_size_fraction,
                negative_space_zone: self.negative_space_zone,
            },
            style: Style {
                mood: self.mood,
                background_type: self.background_type,
                background_color_hex: self.background_color,
                accent_color_hex: self.accent_color,
                lighting: self.lighting,
                effects: self.effects.iter().copied().collect(),
            },
            typography: Typography {
                headline: self.headline,
                tagline: self.tagline,
                cta: self.cta,
            },
        }
    }
}

const fn text(font_size: u32, weight: u16, color: HexColor, shadow: bool) -> TextStyle {
    TextStyle {
        font_size,
        weight,
        color,
        shadow,
    }
}

static GENERAL: StyleTemplate = StyleTemplate {
    layout_type: LayoutType::HeroProduct,
    product_position: ProductPosition::Center,
    product_size_fraction: 0.55,
    negative_space_zone: NegativeSpaceZone::Top,
    mood: Mood::Premium,
    background_type: BackgroundType::DarkGradient,
    background_color: HexColor::rgb(0x1A, 0x1A, 0x2E),
    accent_color: HexColor::rgb(0xFF, 0x47, 0x57),
    lighting: Lighting::Cinematic,
    effects: &[Effect::SoftShadow, Effect::Glow],
    headline: text(64, 800, HexColor::WHITE, true),
    tagline: text(28, 500, HexColor::rgb(0xE0, 0xE0, 0xE0), true),
    cta: text(24, 700, HexColor::WHITE, false),
    default_cta: "Shop Now",
};

static GAMING: StyleTemplate = StyleTemplate {
    layout_type: LayoutType::HeroProduct,
    product_position: ProductPosition::Center,
    product_size_fraction: 0.6,
    negative_space_zone: NegativeSpaceZone::Top,
    mood: Mood::Aggressive,
    background_type: BackgroundType::Neon,
    background_color: HexColor::rgb(0x0A, 0x0A, 0x0F),
    accent_color: HexColor::rgb(0xFF, 0x00, 0xFF),
    lighting: Lighting::Neon,
    effects: &[Effect::Glow, Effect::Particles],
    headline: text(72, 900, HexColor::WHITE, true),
    tagline: text(28, 600, HexColor::rgb(0x00, 0xFF, 0xFF), true),
    cta: text(24, 800, HexColor::WHITE, false),
    default_cta: "Shop Now",
};

static TECH: StyleTemplate = StyleTemplate {
    layout_type: LayoutType::HeroProduct,
    product_position: ProductPosition::Center,
    product_size_fraction: 0.55,
    negative_space_zone: NegativeSpaceZone::Top,
    mood: Mood::Trustworthy,
    background_type: BackgroundType::DarkGradient,
    background_color: HexColor::rgb(0x0C, 0x0C, 0x0C),
    accent_color: HexColor::rgb(0x3B, 0x82, 0xF6),
    lighting: Lighting::Studio,
    effects: &[Effect::Reflection, Effect::Glow],
    headline: text(64, 700, HexColor::WHITE, true),
    tagline: text(26, 400, HexColor::rgb(0xC8, 0xD0, 0xDA), true),
    cta: text(24, 700, HexColor::WHITE, false),
    default_cta: "Learn More",
};

static FASHION: StyleTemplate = StyleTemplate {
    layout_type: LayoutType::LeftHero,
    product_position: ProductPosition::Left,
    product_size_fraction: 0.6,
    negative_space_zone: NegativeSpaceZone::Right,
    mood: Mood::Premium,
    background_type: BackgroundType::Studio,
    background_color: HexColor::rgb(0xF5, 0xF0, 0xEB),
    accent_color: HexColor::rgb(0x11, 0x11, 0x11),
    lighting: Lighting::Soft,
    effects: &[Effect::SoftShadow],
    headline: text(60, 700, HexColor::rgb(0x11, 0x11, 0x11), false),
    tagline: text(26, 400, HexColor::rgb(0x44, 0x44, 0x44), false),
    cta: text(22, 700, HexColor::WHITE, false),
    default_cta: "Shop the Look",
};

static BEAUTY: StyleTemplate = StyleTemplate {
    layout_type: LayoutType::HeroProduct,
    product_position: ProductPosition::Center,
    product_size_fraction: 0.5,
    negative_space_zone: NegativeSpaceZone::Top,
    mood: Mood::Luxury,
    background_type: BackgroundType::LightGradient,
    background_color: HexColor::rgb(0xF8, 0xE8, 0xEE),
    accent_color: HexColor::rgb(0xC2, 0x18, 0x5B),
    lighting: Lighting::Soft,
    effects: &[Effect::Glow, Effect::Reflection],
    headline: text(60, 700, HexColor::rgb(0x2D, 0x1B, 0x2E), false),
    tagline: text(26, 400, HexColor::rgb(0x5A, 0x3E, 0x5C), false),
    cta: text(22, 700, HexColor::WHITE, false),
    default_cta: "Discover Now",
};

static FOOD: StyleTemplate = StyleTemplate {
    layout_type: LayoutType::Lifestyle,
    product_position: ProductPosition::Center,
    product_size_fraction: 0.6,
    negative_space_zone: NegativeSpaceZone::Top,
    mood: Mood::Fresh,
    background_type: BackgroundType::Lifestyle,
    background_color: HexColor::rgb(0xFF, 0xF4, 0xE0),
    accent_color: HexColor::rgb(0xE4, 0x57, 0x2E),
    lighting: Lighting::Natural,
    effects: &[Effect::Bokeh],
    headline: text(64, 800, HexColor::rgb(0x3E, 0x27, 0x23), false),
    tagline: text(26, 500, HexColor::rgb(0x5D, 0x40, 0x37), false),
    cta: text(24, 700, HexColor::WHITE, false),
    default_cta: "Order Now",
};

static FITNESS: StyleTemplate = StyleTemplate {
    layout_type: LayoutType::HeroProduct,
    product_position: ProductPosition::Center,
    product_size_fraction: 0.6,
    negative_space_zone: NegativeSpaceZone::Top,
    mood: Mood::Energetic,
    background_type: BackgroundType::DarkGradient,
    background_color: HexColor::rgb(0x11, 0x18, 0x27),
    accent_color: HexColor::rgb(0xF9, 0x73, 0x16),
    lighting: Lighting::Dramatic,
    effects: &[Effect::Particles, Effect::SoftShadow],
    headline: text(70, 900, HexColor::WHITE, true),
    tagline: text(28, 600, HexColor::rgb(0xFD, 0xBA, 0x74), true),
    cta: text(24, 800, HexColor::WHITE, false),
    default_cta: "Get Yours",
};

static HOME: StyleTemplate = StyleTemplate {
    layout_type: LayoutType::Lifestyle,
    product_position: ProductPosition::Left,
    product_size_fraction: 0.55,
    negative_space_zone: NegativeSpaceZone::Right,
    mood: Mood::Warm,
    background_type: BackgroundType::Lifestyle,
    background_color: HexColor::rgb(0xEF, 0xE6, 0xDA),
    accent_color: HexColor::rgb(0x8D, 0x6E, 0x63),
    lighting: Lighting::Natural,
    effects: &[Effect::SoftShadow, Effect::Bokeh],
    headline: text(58, 700, HexColor::rgb(0x3E, 0x2F, 0x25), false),
    tagline: text(26, 400, HexColor::rgb(0x5D, 0x4A, 0x3C), false),
    cta: text(22, 700, HexColor::WHITE, false),
    default_cta: "Shop Now",
};

static JEWELRY: StyleTemplate = StyleTemplate {
    layout_type: LayoutType::HeroProduct,
    product_position: ProductPosition::Center,
    product_size_fraction: 0.45,
    negative_space_zone: NegativeSpaceZone::Top,
    mood: Mood::Luxury,
    background_type: BackgroundType::DarkGradient,
    background_color: HexColor::rgb(0x0A, 0x0A, 0x0A),
    accent_color: HexColor::rgb(0xD4, 0xAF, 0x37),
    lighting: Lighting::Dramatic,
    effects: &[Effect::Glow, Effect::Reflection, Effect::LensFlare],
    headline: text(60, 600, HexColor::rgb(0xF5, 0xE6, 0xC4), true),
    tagline: text(24, 400, HexColor::rgb(0xC0, 0xC0, 0xC0), true),
    cta: text(22, 700, HexColor::rgb(0x0A, 0x0A, 0x0A), false),
    default_cta: "Discover",
};

static KIDS: StyleTemplate = StyleTemplate {
    layout_type: LayoutType::FeatureCallouts,
    product_position: ProductPosition::Center,
    product_size_fraction: 0.5,
    negative_space_zone: NegativeSpaceZone::Top,
    mood: Mood::Playful,
    background_type: BackgroundType::LightGradient,
    background_color: HexColor::rgb(0xFF, 0xF3, 0xC4),
    accent_color: HexColor::rgb(0xFF, 0x6B, 0x6B),
    lighting: Lighting::Soft,
    effects: &[Effect::Particles],
    headline: text(66, 900, HexColor::rgb(0x2B, 0x2D, 0x42), false),
    tagline: text(28, 600, HexColor::rgb(0x43, 0x46, 0x5E), false),
    cta: text(24, 800, HexColor::WHITE, false),
    default_cta: "Shop Now",
};
