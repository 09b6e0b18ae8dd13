mod common;

use adforge::{
    AdCopy, CANVAS_SIZE, CanvasArtifact, HexColor, Industry, SourceKind, StyleTemplate,
    coords::defaults::default_coordinates, render::compositor::TextCompositor,
    render::overlay::OverlayKind, sanitize_text,
};
use common::init_tracing;

fn canvas() -> CanvasArtifact {
    let image = image::RgbaImage::from_fn(CANVAS_SIZE, CANVAS_SIZE, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 90, 255])
    });
    CanvasArtifact::new(image, SourceKind::Generated, false).unwrap()
}

const FORBIDDEN: &[char] = &[
    '\u{0000}', '\u{0007}', '\u{001B}', '\u{007F}', '\u{0085}', '\u{200B}', '\u{200C}', '\u{200D}',
    '\u{2060}', '\u{FEFF}', '\u{E000}', '\u{2588}', '\u{2591}', '\u{2800}',
];

#[test]
fn headline_overlay_contains_only_sanitized_text() {
    init_tracing();
    let raw = "Le\u{200B}vel\u{0007} U\u{FEFF}p\u{200D}\u{2588}";
    let plan = StyleTemplate::for_industry(Industry::Gaming).to_plan();
    let copy = AdCopy::new(raw, None, "Shop\u{200C} Now");
    let coords = default_coordinates(&plan, &copy);

    let overlays = TextCompositor::new(&[]).overlays(&coords, &copy, &plan, CANVAS_SIZE);
    let headline = overlays
        .iter()
        .find(|o| o.kind == OverlayKind::Headline)
        .unwrap();

    assert_eq!(headline.text, sanitize_text(raw));
    assert_eq!(headline.text, "Level Up");
    for o in &overlays {
        assert!(!o.svg.chars().any(|c| FORBIDDEN.contains(&c)), "{:?}", o.kind);
    }
    assert_eq!(overlays.last().unwrap().text, "Shop Now");
}

#[test]
fn compositing_is_byte_identical_across_runs() {
    init_tracing();
    let plan = StyleTemplate::for_industry(Industry::Beauty).to_plan();
    let copy = AdCopy::new(
        "Glow Like Never Before With Our Brand New Serum Collection",
        Some("Dermatologist tested".into()),
        "Discover Now",
    );
    let coords = default_coordinates(&plan, &copy);
    let c = canvas();

    let a = TextCompositor::new(&[]).compose(&c, &coords, &copy, &plan).unwrap();
    let b = TextCompositor::new(&[]).compose(&c, &coords, &copy, &plan).unwrap();
    assert_eq!(a.as_raw(), b.as_raw());

    let png_a = adforge::canvas::decode::encode_png(&a).unwrap();
    let png_b = adforge::canvas::decode::encode_png(&b).unwrap();
    assert_eq!(png_a, png_b);
}

#[test]
fn sanitize_is_idempotent_over_a_codepoint_sweep() {
    let ranges = [
        0x0000u32..0x0300,
        0x2000..0x2100,
        0x2580..0x25A0,
        0x2800..0x2810,
        0xE000..0xE010,
        0xFE00..0xFE10,
        0xFFF0..0x10000,
        0x1F600..0x1F610,
        0xE0000..0xE0010,
    ];
    for range in ranges {
        let s: String = range.filter_map(char::from_u32).collect();
        let once = sanitize_text(&s);
        assert_eq!(sanitize_text(&once), once);
        assert!(!once.chars().any(|c| FORBIDDEN.contains(&c)));
        assert!(!once.chars().any(|c| c.is_control()));
        assert!(!once.contains("  "));
        assert_eq!(once.trim(), once);
    }
}

#[test]
fn cta_background_follows_coordinates() {
    let plan = StyleTemplate::for_industry(Industry::Tech).to_plan();
    let copy = AdCopy::new("Fast", None, "Learn More");
    let mut coords = default_coordinates(&plan, &copy);
    coords.cta.background_color = HexColor::rgb(0x10, 0xB9, 0x81);

    let overlays = TextCompositor::new(&[]).overlays(&coords, &copy, &plan, CANVAS_SIZE);
    let cta = overlays.iter().find(|o| o.kind == OverlayKind::Cta).unwrap();
    assert!(cta.svg.contains(&HexColor::rgb(0x10, 0xB9, 0x81).lighten(0.15).to_string()));
}
