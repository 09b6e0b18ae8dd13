use crate::{
    coords::{CoordinateSet, CtaPlacement, SafeZones, TextAlign, TextPlacement},
    foundation::core::{CANVAS_SIZE, Zone},
    plan::{
        copy::AdCopy,
        model::{LayoutPlan, NegativeSpaceZone},
    },
    render::sanitize::sanitize_text,
};

const MARGIN: u32 = 80;
const CTA_HEIGHT: u32 = 64;
const CTA_MIN_WIDTH: u32 = 220;
const CTA_CHAR_WIDTH: u32 = 16;
const CTA_PADDING: u32 = 80;
const TEXT_BAND: u32 = 340;

/// Rule-based coordinates derived from the canvas size and the plan's copy zone.
///
/// Always complete: the CTA is always placed, the tagline whenever the copy has one.
pub fn default_coordinates(plan: &LayoutPlan, copy: &AdCopy) -> CoordinateSet {
    let s = CANVAS_SIZE;
    let typo = &plan.typography;

    // (anchor x, headline baseline, tagline baseline, cta top, column width, text zone)
    let (cx, headline_y, tagline_y, cta_y, column, text_zone) =
        match plan.composition.negative_space_zone {
            NegativeSpaceZone::Top => (
                s / 2,
                120,
                180,
                240,
                s - 2 * MARGIN,
                Zone::new(0, 0, s, TEXT_BAND),
            ),
            NegativeSpaceZone::Bottom => (
                s / 2,
                s - 200,
                s - 140,
                s - 80,
                s - 2 * MARGIN,
                Zone::new(0, s - TEXT_BAND, s, TEXT_BAND),
            ),
            NegativeSpaceZone::Left => (
                s / 4,
                s * 2 / 5,
                s * 2 / 5 + 70,
                s * 2 / 5 + 120,
                s / 2 - MARGIN,
                Zone::new(0, 0, s / 2, s),
            ),
            NegativeSpaceZone::Right => (
                s * 3 / 4,
                s * 2 / 5,
                s * 2 / 5 + 70,
                s * 2 / 5 + 120,
                s / 2 - MARGIN,
                Zone::new(s / 2, 0, s / 2, s),
            ),
        };

    let product = match plan.composition.negative_space_zone {
        NegativeSpaceZone::Top => Zone::new(0, TEXT_BAND, s, s - TEXT_BAND),
        NegativeSpaceZone::Bottom => Zone::new(0, 0, s, s - TEXT_BAND),
        NegativeSpaceZone::Left => Zone::new(s / 2, 0, s / 2, s),
        NegativeSpaceZone::Right => Zone::new(0, 0, s / 2, s),
    };

    let label_len = sanitize_text(&copy.cta).chars().count() as u32;
    let cta_width = (label_len * CTA_CHAR_WIDTH + CTA_PADDING)
        .max(CTA_MIN_WIDTH)
        .min(column);
    let cta_x = cx.saturating_sub(cta_width / 2).min(s - cta_width);

    let headline = TextPlacement {
        x: cx,
        y: headline_y,
        max_width: column,
        font_size: typo.headline.font_size,
        color: typo.headline.color,
        align: TextAlign::Center,
    };
    let tagline = copy.tagline.as_ref().map(|_| TextPlacement {
        x: cx,
        y: tagline_y,
        max_width: column,
        font_size: typo.tagline.font_size,
        color: typo.tagline.color,
        align: TextAlign::Center,
    });

    CoordinateSet {
        headline,
        tagline,
        cta: CtaPlacement {
            x: cta_x,
            y: cta_y,
            width: cta_width,
            height: CTA_HEIGHT,
            corner_radius: CTA_HEIGHT / 2,
            background_color: plan.style.accent_color_hex,
        },
        safe_zones: SafeZones {
            product,
            text: text_zone,
        },
    }
}
