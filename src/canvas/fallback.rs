use image::{RgbaImage, imageops::FilterType};

use crate::{
    canvas::{CanvasArtifact, SourceKind, decode::premultiply_rgba8_in_place},
    foundation::{
        core::{CANVAS_SIZE, HexColor},
        error::AdResult,
    },
    plan::model::{LayoutPlan, NegativeSpaceZone, ProductPosition},
    render::composite::blit_over,
};

/// Build the deterministic non-AI canvas: radial gradient plus the aspect-fit product.
///
/// Never bakes text. Fails only if the canvas invariants themselves are broken.
pub fn compose_fallback(product: &RgbaImage, plan: &LayoutPlan) -> AdResult<CanvasArtifact> {
    let mut canvas = radial_gradient(CANVAS_SIZE, plan.style.background_color_hex);

    let (pw, ph) = product.dimensions();
    let box_side = (plan.composition.product_size_fraction * f64::from(CANVAS_SIZE)).round();
    let scale = (box_side / f64::from(pw)).min(box_side / f64::from(ph));
    let nw = ((f64::from(pw) * scale).round() as u32).clamp(1, CANVAS_SIZE);
    let nh = ((f64::from(ph) * scale).round() as u32).clamp(1, CANVAS_SIZE);

    let resized = image::imageops::resize(product, nw, nh, FilterType::Lanczos3);
    let mut sprite = resized.into_raw();
    premultiply_rgba8_in_place(&mut sprite);

    let (cx, cy) = product_center(plan);
    let x0 = (cx - f64::from(nw) / 2.0)
        .round()
        .clamp(0.0, f64::from(CANVAS_SIZE - nw)) as i64;
    let y0 = (cy - f64::from(nh) / 2.0)
        .round()
        .clamp(0.0, f64::from(CANVAS_SIZE - nh)) as i64;
    blit_over(&mut canvas, &sprite, nw, nh, x0, y0)?;

    CanvasArtifact::new(canvas, SourceKind::FallbackComposite, false)
}

/// Product center in pixels, pushed away from the copy zone.
fn product_center(plan: &LayoutPlan) -> (f64, f64) {
    let s = f64::from(CANVAS_SIZE);
    let (mut cx, mut cy) = match plan.composition.product_position {
        ProductPosition::Center => (0.5, 0.5),
        ProductPosition::Left => (0.32, 0.5),
        ProductPosition::Right => (0.68, 0.5),
        ProductPosition::Top => (0.5, 0.38),
        ProductPosition::Bottom => (0.5, 0.62),
    };
    match plan.composition.negative_space_zone {
        NegativeSpaceZone::Top => cy += 0.08,
        NegativeSpaceZone::Bottom => cy -= 0.08,
        NegativeSpaceZone::Left => cx += 0.08,
        NegativeSpaceZone::Right => cx -= 0.08,
    }
    (cx * s, cy * s)
}

/// Opaque radial gradient: a lifted center fading to a darkened rim.
pub fn radial_gradient(size: u32, base: HexColor) -> RgbaImage {
    let inner = base.lighten(0.18);
    let outer = base.darken(0.35);
    let center = f64::from(size) / 2.0;
    let radius = f64::from(size) * 0.75;

    RgbaImage::from_fn(size, size, |x, y| {
        let dx = f64::from(x) + 0.5 - center;
        let dy = f64::from(y) + 0.5 - center * 0.9;
        let t = smoothstep(((dx * dx + dy * dy).sqrt() / radius).clamp(0.0, 1.0));
        let mix = |a: u8, b: u8| -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
        };
        image::Rgba([mix(inner.r, outer.r), mix(inner.g, outer.g), mix(inner.b, outer.b), 255])
    })
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::templates::{Industry, StyleTemplate};

    fn product(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, image::Rgba([250, 10, 10, 255]))
    }

    #[test]
    fn fallback_is_canonical_size_and_opaque() {
        let plan = StyleTemplate::for_industry(Industry::Gaming).to_plan();
        let canvas = compose_fallback(&product(800, 800), &plan).unwrap();
        assert_eq!(canvas.image.dimensions(), (CANVAS_SIZE, CANVAS_SIZE));
        assert_eq!(canvas.source_kind, SourceKind::FallbackComposite);
        assert!(!canvas.includes_baked_text);
        assert!(canvas.image.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn wide_product_keeps_aspect_ratio() {
        let plan = StyleTemplate::for_industry(Industry::General).to_plan();
        let canvas = compose_fallback(&product(400, 100), &plan).unwrap();
        // 0.55 * 1080 = 594 wide, 148.5 tall, centered horizontally.
        let is_red = |p: &image::Rgba<u8>| p[0] > 240 && p[1] < 40;
        let red_rows = (0..CANVAS_SIZE)
            .filter(|&y| is_red(canvas.image.get_pixel(CANVAS_SIZE / 2, y)))
            .count();
        assert!((145..=152).contains(&red_rows), "rows: {red_rows}");
        assert!(is_red(canvas.image.get_pixel(CANVAS_SIZE / 2 - 290, 626)));
        assert!(!is_red(canvas.image.get_pixel(CANVAS_SIZE / 2 - 300, 626)));
    }

    #[test]
    fn fallback_is_deterministic() {
        let plan = StyleTemplate::for_industry(Industry::Fashion).to_plan();
        let a = compose_fallback(&product(300, 500), &plan).unwrap();
        let b = compose_fallback(&product(300, 500), &plan).unwrap();
        assert_eq!(a.image.as_raw(), b.image.as_raw());
    }

    #[test]
    fn gradient_center_is_lighter_than_corner() {
        let img = radial_gradient(64, HexColor::rgb(100, 100, 100));
        assert!(img.get_pixel(32, 29)[0] > img.get_pixel(0, 63)[0]);
    }
}
