use std::fmt::Write as _;

use crate::{
    coords::{CtaPlacement, TextPlacement},
    foundation::core::{HexColor, Zone},
    plan::model::TextStyle,
    render::sanitize::sanitize_text,
};

pub const FONT_FAMILY: &str = "Inter, 'Helvetica Neue', Arial, sans-serif";
/// Smallest headline size reached by shrinking before the text wraps.
pub const MIN_HEADLINE_SIZE: u32 = 28;
const MIN_LABEL_SIZE: u32 = 12;
const LINE_HEIGHT: f64 = 1.15;
const MAX_LINES: usize = 2;
/// Glyph extents as fractions of the font size, generous for common sans faces.
const DESCENT: f64 = 0.25;
const CAP_HEIGHT: f64 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayKind {
    Headline,
    Tagline,
    Cta,
}

/// A full-canvas SVG layer carrying one piece of copy.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub kind: OverlayKind,
    /// Sanitized visible text, exactly as drawn (wrapped lines joined by a space).
    pub text: String,
    pub svg: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FittedText {
    pub font_size: u32,
    pub lines: Vec<String>,
}

impl FittedText {
    pub fn line_height(&self) -> f64 {
        f64::from(self.font_size) * LINE_HEIGHT
    }

    /// Distance from the first baseline to the last.
    pub fn last_baseline_offset(&self) -> f64 {
        self.line_height() * self.lines.len().saturating_sub(1) as f64
    }

    pub fn descent(&self) -> f64 {
        f64::from(self.font_size) * DESCENT
    }

    pub fn cap_height(&self) -> f64 {
        f64::from(self.font_size) * CAP_HEIGHT
    }
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Average advance per character as a fraction of the font size; heavier weights run wider.
fn advance_factor(weight: u16) -> f64 {
    (0.52 + (f64::from(weight) - 400.0) / 500.0 * 0.08).clamp(0.48, 0.62)
}

pub fn estimate_width(text: &str, font_size: u32, weight: u16) -> f64 {
    text.chars().count() as f64 * f64::from(font_size) * advance_factor(weight)
}

/// Largest size `<= font_size` at which `chars` characters fit `max_width`.
///
/// `None` once the size would drop below `floor`.
fn size_for(chars: usize, font_size: u32, weight: u16, max_width: u32, floor: u32) -> Option<u32> {
    if chars == 0 {
        return Some(font_size);
    }
    let fitted = (f64::from(max_width) / (chars as f64 * advance_factor(weight))).floor() as u32;
    let size = fitted.min(font_size);
    (size >= floor).then_some(size)
}

/// Shrink to fit `max_width`; at the floor, wrap onto at most two lines.
pub fn fit_text(text: &str, font_size: u32, weight: u16, max_width: u32) -> FittedText {
    let floor = MIN_HEADLINE_SIZE.min(font_size);
    if let Some(size) = size_for(text.chars().count(), font_size, weight, max_width, floor) {
        return FittedText {
            font_size: size,
            lines: vec![text.to_string()],
        };
    }

    let words: Vec<&str> = text.split(' ').collect();
    if words.len() < MAX_LINES {
        return FittedText {
            font_size: floor,
            lines: vec![text.to_string()],
        };
    }

    // Split where the longer line is shortest; ties keep the earlier split.
    let (best_split, _) = (1..words.len())
        .map(|i| {
            let a = words[..i].join(" ").chars().count();
            let b = words[i..].join(" ").chars().count();
            (i, a.max(b))
        })
        .fold((1, usize::MAX), |best, cur| if cur.1 < best.1 { cur } else { best });

    let lines = vec![words[..best_split].join(" "), words[best_split..].join(" ")];
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let size = size_for(longest, font_size, weight, max_width, floor).unwrap_or(floor);
    FittedText {
        font_size: size,
        lines,
    }
}

fn svg_open(out: &mut String, size: u32) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    );
}

fn text_shadow_filter(out: &mut String, id: &str) {
    let _ = write!(
        out,
        r##"<filter id="{id}" x="-10%" y="-40%" width="120%" height="180%"><feDropShadow dx="0" dy="2" stdDeviation="3" flood-color="#000000" flood-opacity="0.55"/></filter>"##
    );
}

fn text_element(
    out: &mut String,
    placement: &TextPlacement,
    fitted: &FittedText,
    style: &TextStyle,
    filter: Option<&str>,
) {
    let filter_attr = filter
        .map(|id| format!(r#" filter="url(#{id})""#))
        .unwrap_or_default();
    let _ = write!(
        out,
        r#"<text font-family="{FONT_FAMILY}" font-size="{fs}" font-weight="{weight}" fill="{color}" text-anchor="{anchor}"{filter_attr}>"#,
        fs = fitted.font_size,
        weight = style.weight,
        color = placement.color,
        anchor = placement.align.svg_anchor(),
    );
    let line_height = fitted.line_height();
    for (i, line) in fitted.lines.iter().enumerate() {
        let y = f64::from(placement.y) + line_height * i as f64;
        let _ = write!(
            out,
            r#"<tspan x="{x}" y="{y:.1}">{text}</tspan>"#,
            x = placement.x,
            text = escape_xml(line),
        );
    }
    out.push_str("</text>");
}

/// Soft vertical gradient over the text zone, darkest at the canvas edge it touches.
fn scrim(out: &mut String, zone: Zone, size: u32) {
    let from_top = zone.y + zone.height / 2 <= size / 2;
    let (y1, y2) = if from_top { (0, 1) } else { (1, 0) };
    let _ = write!(
        out,
        r##"<defs><linearGradient id="scrim" x1="0" y1="{y1}" x2="0" y2="{y2}"><stop offset="0" stop-color="#000000" stop-opacity="0.45"/><stop offset="1" stop-color="#000000" stop-opacity="0"/></linearGradient></defs><rect x="{x}" y="{y}" width="{w}" height="{h}" fill="url(#scrim)"/>"##,
        x = zone.x,
        y = zone.y,
        w = zone.width,
        h = zone.height,
    );
}

/// Headline or tagline layer. Returns `None` when the sanitized text is empty.
pub fn text_overlay(
    kind: OverlayKind,
    placement: &TextPlacement,
    raw_text: &str,
    style: &TextStyle,
    scrim_zone: Option<Zone>,
    size: u32,
) -> Option<Overlay> {
    let text = sanitize_text(raw_text);
    if text.is_empty() {
        return None;
    }
    let fitted = fit_text(&text, placement.font_size, style.weight, placement.max_width);

    let mut svg = String::new();
    svg_open(&mut svg, size);
    if let Some(zone) = scrim_zone {
        scrim(&mut svg, zone, size);
    }
    let filter = style.shadow.then_some("text-shadow");
    if let Some(id) = filter {
        svg.push_str("<defs>");
        text_shadow_filter(&mut svg, id);
        svg.push_str("</defs>");
    }
    text_element(&mut svg, placement, &fitted, style, filter);
    svg.push_str("</svg>");

    Some(Overlay {
        kind,
        text: fitted.lines.join(" "),
        svg,
    })
}

/// Rounded gradient button with a drop shadow and a centered label.
pub fn cta_overlay(
    placement: &CtaPlacement,
    raw_label: &str,
    style: &TextStyle,
    size: u32,
) -> Overlay {
    let label = sanitize_text(raw_label);
    let base: HexColor = placement.background_color;
    let (x, y, w, h) = (placement.x, placement.y, placement.width, placement.height);

    let mut font_size = style.font_size.min(h * 45 / 100).max(1);
    let inner = w.saturating_sub(24).max(1);
    if estimate_width(&label, font_size, style.weight) > f64::from(inner) {
        font_size = size_for(label.chars().count(), font_size, style.weight, inner, MIN_LABEL_SIZE)
            .unwrap_or(MIN_LABEL_SIZE.min(font_size));
    }
    let baseline = f64::from(y) + f64::from(h) / 2.0 + f64::from(font_size) * 0.35;

    let mut svg = String::new();
    svg_open(&mut svg, size);
    let _ = write!(
        svg,
        r##"<defs><linearGradient id="cta-fill" x1="0" y1="0" x2="0" y2="1"><stop offset="0" stop-color="{top}"/><stop offset="1" stop-color="{bottom}"/></linearGradient><filter id="cta-shadow" x="-20%" y="-20%" width="140%" height="180%"><feDropShadow dx="0" dy="6" stdDeviation="8" flood-color="#000000" flood-opacity="0.35"/></filter></defs>"##,
        top = base.lighten(0.15),
        bottom = base.darken(0.15),
    );
    let _ = write!(
        svg,
        r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{r}" ry="{r}" fill="url(#cta-fill)" filter="url(#cta-shadow)"/>"#,
        r = placement.corner_radius,
    );
    if !label.is_empty() {
        let _ = write!(
            svg,
            r#"<text x="{cx:.1}" y="{baseline:.1}" font-family="{FONT_FAMILY}" font-size="{font_size}" font-weight="{weight}" fill="{color}" text-anchor="middle">{text}</text>"#,
            cx = f64::from(x) + f64::from(w) / 2.0,
            weight = style.weight,
            color = style.color,
            text = escape_xml(&label),
        );
    }
    svg.push_str("</svg>");

    Overlay {
        kind: OverlayKind::Cta,
        text: label,
        svg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::TextAlign;

    fn placement(max_width: u32, font_size: u32) -> TextPlacement {
        TextPlacement {
            x: 540,
            y: 120,
            max_width,
            font_size,
            color: HexColor::WHITE,
            align: TextAlign::Center,
        }
    }

    fn style(shadow: bool) -> TextStyle {
        TextStyle {
            font_size: 64,
            weight: 800,
            color: HexColor::WHITE,
            shadow,
        }
    }

    #[test]
    fn short_text_keeps_its_size() {
        let f = fit_text("Level Up", 64, 800, 920);
        assert_eq!(f.font_size, 64);
        assert_eq!(f.lines, vec!["Level Up"]);
    }

    #[test]
    fn long_text_shrinks_then_wraps() {
        let shrunk = fit_text("The Ultimate Wireless Headset", 72, 800, 920);
        assert!(shrunk.font_size < 72 && shrunk.font_size >= MIN_HEADLINE_SIZE);
        assert_eq!(shrunk.lines.len(), 1);

        let long = "Experience the most immersive audio ever built for competitive players";
        let wrapped = fit_text(long, 72, 800, 920);
        assert_eq!(wrapped.lines.len(), 2);
        assert!(wrapped.font_size >= MIN_HEADLINE_SIZE);
        assert_eq!(wrapped.lines.join(" "), long);
    }

    #[test]
    fn fitting_is_deterministic() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda";
        assert_eq!(fit_text(text, 64, 700, 600), fit_text(text, 64, 700, 600));
    }

    #[test]
    fn text_is_sanitized_and_escaped() {
        let o = text_overlay(
            OverlayKind::Headline,
            &placement(920, 64),
            "Tom\u{200B} & Jerry\u{0007} <3",
            &style(false),
            None,
            1080,
        )
        .unwrap();
        assert_eq!(o.text, "Tom & Jerry <3");
        assert!(o.svg.contains("Tom &amp; Jerry &lt;3"));
        assert!(!o.svg.contains('\u{200B}'));
        assert!(!o.svg.contains("filter="));
    }

    #[test]
    fn empty_text_yields_no_overlay() {
        assert!(
            text_overlay(
                OverlayKind::Tagline,
                &placement(920, 28),
                "\u{200B}\u{FEFF}",
                &style(true),
                None,
                1080
            )
            .is_none()
        );
    }

    #[test]
    fn shadowed_headline_carries_filter_and_scrim() {
        let o = text_overlay(
            OverlayKind::Headline,
            &placement(920, 64),
            "Level Up",
            &style(true),
            Some(Zone::new(0, 0, 1080, 340)),
            1080,
        )
        .unwrap();
        assert!(o.svg.contains(r#"filter="url(#text-shadow)""#));
        assert!(o.svg.contains(r#"fill="url(#scrim)""#));
    }

    #[test]
    fn cta_has_gradient_shadow_and_centered_label() {
        let cta = CtaPlacement {
            x: 430,
            y: 900,
            width: 220,
            height: 64,
            corner_radius: 32,
            background_color: HexColor::rgb(0xFF, 0x00, 0xFF),
        };
        let o = cta_overlay(&cta, "Shop\u{00A0}Now", &style(false), 1080);
        assert_eq!(o.kind, OverlayKind::Cta);
        assert_eq!(o.text, "Shop Now");
        assert!(o.svg.contains(r#"rx="32""#));
        assert!(o.svg.contains("url(#cta-fill)"));
        assert!(o.svg.contains("url(#cta-shadow)"));
        assert!(o.svg.contains(r#"x="540.0""#));
    }
}
