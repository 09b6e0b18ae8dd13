use std::path::PathBuf;

use image::RgbaImage;

use crate::{
    canvas::CanvasArtifact,
    coords::{CoordinateSet, TextPlacement},
    foundation::error::{AdError, AdResult},
    plan::{copy::AdCopy, model::LayoutPlan},
    render::{
        composite::over_in_place,
        overlay::{FittedText, Overlay, OverlayKind, cta_overlay, fit_text, text_overlay},
        raster::FontBook,
        sanitize::sanitize_text,
    },
};

/// Vertical clearance between stacked copy elements.
const STACK_GAP: f64 = 8.0;

/// Deterministic text compositing onto a finished canvas.
///
/// The only pipeline stage without a fallback: invalid geometry is an error.
#[derive(Clone)]
pub struct TextCompositor {
    fonts: FontBook,
}

impl TextCompositor {
    pub fn new(font_dirs: &[PathBuf]) -> Self {
        Self {
            fonts: FontBook::load(font_dirs),
        }
    }

    /// Push the tagline and CTA below the fitted headline block.
    ///
    /// Only elements placed below the headline's first baseline move. When the pushed stack runs
    /// off the canvas it is lifted back as a whole. Applying it twice changes nothing.
    pub fn stack(
        coords: &CoordinateSet,
        copy: &AdCopy,
        plan: &LayoutPlan,
        size: u32,
    ) -> CoordinateSet {
        let typo = &plan.typography;
        let mut out = coords.clone();
        let top = out.headline.y;

        let headline = fitted(&copy.headline, &out.headline, typo.headline.weight);
        let mut floor = match &headline {
            Some(h) => f64::from(top) + h.last_baseline_offset() + h.descent(),
            None => f64::from(top),
        };

        let mut tagline_below = false;
        if let (Some(p), Some(text)) = (out.tagline.as_mut(), copy.tagline.as_deref())
            && p.y > top
            && let Some(t) = fitted(text, p, typo.tagline.weight)
        {
            let needed = (floor + STACK_GAP + t.cap_height()).ceil() as u32;
            p.y = p.y.max(needed);
            floor = f64::from(p.y) + t.last_baseline_offset() + t.descent();
            tagline_below = true;
        }

        let cta_below = out.cta.y > top;
        if cta_below {
            out.cta.y = out.cta.y.max((floor + STACK_GAP).ceil() as u32);
            floor = floor.max(f64::from(out.cta.y.saturating_add(out.cta.height)));
        }

        let overflow = (floor.ceil() as u32).saturating_sub(size);
        let headroom = headline
            .as_ref()
            .map_or(top, |h| top.saturating_sub(h.cap_height().ceil() as u32));
        let lift = overflow.min(headroom);
        if lift > 0 {
            out.headline.y -= lift;
            if tagline_below && let Some(p) = out.tagline.as_mut() {
                p.y -= lift;
            }
            if cta_below {
                out.cta.y -= lift;
            }
        }
        out
    }

    /// Overlays in z-order: headline, tagline, CTA. Empty headline/tagline text is skipped.
    pub fn overlays(
        &self,
        coords: &CoordinateSet,
        copy: &AdCopy,
        plan: &LayoutPlan,
        size: u32,
    ) -> Vec<Overlay> {
        let coords = &Self::stack(coords, copy, plan, size);
        let typo = &plan.typography;
        let scrim = typo.headline.shadow.then_some(coords.safe_zones.text);

        let mut out = Vec::with_capacity(3);
        out.extend(text_overlay(
            OverlayKind::Headline,
            &coords.headline,
            &copy.headline,
            &typo.headline,
            scrim,
            size,
        ));
        if let (Some(placement), Some(tagline)) =
            (coords.tagline.as_ref(), copy.tagline.as_deref())
        {
            out.extend(text_overlay(
                OverlayKind::Tagline,
                placement,
                tagline,
                &typo.tagline,
                None,
                size,
            ));
        }
        out.push(cta_overlay(&coords.cta, &copy.cta, &typo.cta, size));
        out
    }

    /// Composite the copy onto `canvas`. Canvases that already carry baked text pass through.
    #[tracing::instrument(skip_all, fields(source = ?canvas.source_kind))]
    pub fn compose(
        &self,
        canvas: &CanvasArtifact,
        coords: &CoordinateSet,
        copy: &AdCopy,
        plan: &LayoutPlan,
    ) -> AdResult<RgbaImage> {
        let (w, h) = canvas.image.dimensions();
        if w != h {
            return Err(AdError::geometry(format!("canvas is not square: {w}x{h}")));
        }
        coords.validate(w)?;
        let coords = &Self::stack(coords, copy, plan, w);
        coords.validate(w)?;

        let mut out = canvas.image.clone();
        if canvas.includes_baked_text {
            tracing::debug!("canvas has baked text, skipping overlays");
            return Ok(out);
        }

        for overlay in self.overlays(coords, copy, plan, w) {
            let layer = self.fonts.rasterize(&overlay.svg, w)?;
            over_in_place(&mut out, &layer, 1.0)?;
            tracing::trace!(kind = ?overlay.kind, "overlay composited");
        }
        Ok(out)
    }
}

fn fitted(raw: &str, placement: &TextPlacement, weight: u16) -> Option<FittedText> {
    let text = sanitize_text(raw);
    (!text.is_empty()).then(|| fit_text(&text, placement.font_size, weight, placement.max_width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        canvas::{SourceKind, fallback::radial_gradient},
        coords::defaults::default_coordinates,
        foundation::core::{CANVAS_SIZE, HexColor},
        plan::{
            model::NegativeSpaceZone,
            templates::{Industry, StyleTemplate},
        },
    };

    fn canvas(baked: bool) -> CanvasArtifact {
        let image = radial_gradient(CANVAS_SIZE, HexColor::rgb(30, 30, 60));
        CanvasArtifact::new(image, SourceKind::Generated, baked).unwrap()
    }

    fn setup() -> (LayoutPlan, AdCopy, CoordinateSet) {
        let plan = StyleTemplate::for_industry(Industry::Gaming).to_plan();
        let copy = AdCopy::new("Level Up", Some("Play harder".into()), "Shop Now");
        let coords = default_coordinates(&plan, &copy);
        (plan, copy, coords)
    }

    #[test]
    fn overlays_follow_fixed_z_order() {
        let (plan, copy, coords) = setup();
        let kinds: Vec<_> = TextCompositor::new(&[])
            .overlays(&coords, &copy, &plan, CANVAS_SIZE)
            .into_iter()
            .map(|o| o.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![OverlayKind::Headline, OverlayKind::Tagline, OverlayKind::Cta]
        );
    }

    #[test]
    fn wrapped_headline_pushes_tagline_and_cta_down_in_every_zone() {
        let mut plan = StyleTemplate::for_industry(Industry::Gaming).to_plan();
        let copy = AdCopy::new(
            "Experience the most immersive surround audio ever built for competitive players",
            Some("Play harder".into()),
            "Shop Now",
        );
        let typo = plan.typography;
        for zone in [
            NegativeSpaceZone::Top,
            NegativeSpaceZone::Bottom,
            NegativeSpaceZone::Left,
            NegativeSpaceZone::Right,
        ] {
            plan.composition.negative_space_zone = zone;
            let defaults = default_coordinates(&plan, &copy);
            let coords = TextCompositor::stack(&defaults, &copy, &plan, CANVAS_SIZE);
            coords.validate(CANVAS_SIZE).unwrap();

            let head = fitted(&copy.headline, &coords.headline, typo.headline.weight).unwrap();
            assert_eq!(head.lines.len(), 2, "{zone:?}");
            let tag_placement = coords.tagline.unwrap();
            let tag = fitted("Play harder", &tag_placement, typo.tagline.weight).unwrap();

            let head_bottom =
                f64::from(coords.headline.y) + head.last_baseline_offset() + head.descent();
            let tag_top = f64::from(tag_placement.y) - tag.cap_height();
            assert!(head_bottom < tag_top, "{zone:?}: {head_bottom} vs {tag_top}");
            let tag_bottom = f64::from(tag_placement.y) + tag.descent();
            assert!(tag_bottom < f64::from(coords.cta.y), "{zone:?}");

            assert_eq!(TextCompositor::stack(&coords, &copy, &plan, CANVAS_SIZE), coords);
        }
    }

    #[test]
    fn drawn_tagline_uses_the_stacked_baseline() {
        let plan = StyleTemplate::for_industry(Industry::Gaming).to_plan();
        let copy = AdCopy::new(
            "Experience the most immersive surround audio ever built for competitive players",
            Some("Play harder".into()),
            "Shop Now",
        );
        let coords = default_coordinates(&plan, &copy);
        let stacked = TextCompositor::stack(&coords, &copy, &plan, CANVAS_SIZE);
        let tagline_y = stacked.tagline.unwrap().y;
        assert!(tagline_y > coords.tagline.unwrap().y);

        let overlays = TextCompositor::new(&[]).overlays(&coords, &copy, &plan, CANVAS_SIZE);
        let tagline = overlays.iter().find(|o| o.kind == OverlayKind::Tagline).unwrap();
        assert!(tagline.svg.contains(&format!(r#"y="{tagline_y}.0""#)));
    }

    #[test]
    fn single_line_copy_keeps_its_coordinates() {
        let (plan, copy, coords) = setup();
        assert_eq!(TextCompositor::stack(&coords, &copy, &plan, CANVAS_SIZE), coords);
    }

    #[test]
    fn compose_draws_the_button() {
        let (plan, copy, coords) = setup();
        let c = canvas(false);
        let out = TextCompositor::new(&[]).compose(&c, &coords, &copy, &plan).unwrap();
        assert_eq!(out.dimensions(), (CANVAS_SIZE, CANVAS_SIZE));
        let cx = coords.cta.x + coords.cta.width / 4;
        let cy = coords.cta.y + 4;
        assert_ne!(out.get_pixel(cx, cy), c.image.get_pixel(cx, cy));
        assert!(out.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn baked_canvas_passes_through() {
        let (plan, copy, coords) = setup();
        let c = canvas(true);
        let out = TextCompositor::new(&[]).compose(&c, &coords, &copy, &plan).unwrap();
        assert_eq!(out.as_raw(), c.image.as_raw());
    }

    #[test]
    fn out_of_bounds_geometry_is_an_error() {
        let (plan, copy, mut coords) = setup();
        coords.cta.y = CANVAS_SIZE - 10;
        let err = TextCompositor::new(&[])
            .compose(&canvas(false), &coords, &copy, &plan)
            .unwrap_err();
        assert!(matches!(err, AdError::Geometry(_)));
    }
}
