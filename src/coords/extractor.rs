use std::{sync::Arc, time::Duration};

use serde::Deserialize;

use crate::{
    canvas::CanvasArtifact,
    coords::{CoordinateSet, CtaPlacement, SafeZones, TextAlign, TextPlacement, defaults},
    foundation::{
        core::{CANVAS_SIZE, HexColor, Zone},
        error::{AdError, AdResult},
        staged::Staged,
    },
    inference::{AnalysisModel, AnalysisRequest, analyze_json_with_deadline},
    plan::{copy::AdCopy, model::LayoutPlan},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCoordinates {
    headline: RawText,
    #[serde(default)]
    tagline: Option<RawText>,
    cta: RawCta,
    safe_zones: RawSafeZones,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawText {
    x: f64,
    y: f64,
    max_width: f64,
    font_size: f64,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    align: Option<TextAlign>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCta {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    corner_radius: Option<f64>,
    #[serde(default)]
    background_color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSafeZones {
    product: RawZone,
    text: RawZone,
}

#[derive(Debug, Deserialize)]
struct RawZone {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Asks a vision model where the copy should go on a finished canvas.
pub struct CoordinateExtractor {
    model: Arc<dyn AnalysisModel>,
    timeout: Duration,
}

impl CoordinateExtractor {
    pub fn new(model: Arc<dyn AnalysisModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Model-placed coordinates, or the rule-based defaults on any failure or invalid answer.
    #[tracing::instrument(skip_all, fields(source = ?canvas.source_kind))]
    pub fn extract(
        &self,
        canvas: &CanvasArtifact,
        plan: &LayoutPlan,
        copy: &AdCopy,
    ) -> Staged<CoordinateSet> {
        match self.try_extract(canvas, plan, copy) {
            Ok(coords) => {
                tracing::debug!(cta = ?coords.cta, "coordinates extracted");
                Staged::Generated(coords)
            }
            Err(e) => {
                tracing::warn!(error = %e, "coordinate extraction failed, using defaults");
                Staged::fallback(defaults::default_coordinates(plan, copy), e.to_string())
            }
        }
    }

    fn try_extract(
        &self,
        canvas: &CanvasArtifact,
        plan: &LayoutPlan,
        copy: &AdCopy,
    ) -> AdResult<CoordinateSet> {
        let raw = analyze_json_with_deadline::<RawCoordinates>(
            &self.model,
            AnalysisRequest {
                image_png: Some(canvas.to_png()?),
                prompt: extraction_prompt(plan, copy),
            },
            self.timeout,
        )?;
        let coords = convert(raw, plan, copy)?;
        coords.validate(CANVAS_SIZE)?;
        Ok(coords)
    }
}

fn convert(raw: RawCoordinates, plan: &LayoutPlan, copy: &AdCopy) -> AdResult<CoordinateSet> {
    let typo = &plan.typography;
    let headline = text_placement("headline", &raw.headline, typo.headline.color)?;

    let tagline = match (copy.tagline.as_ref(), raw.tagline.as_ref()) {
        (None, _) => None,
        (Some(_), Some(t)) => Some(text_placement("tagline", t, typo.tagline.color)?),
        (Some(_), None) => defaults::default_coordinates(plan, copy).tagline,
    };

    let cta_w = pixel("cta.width", raw.cta.width)?;
    let cta_h = pixel("cta.height", raw.cta.height)?;
    let radius = match raw.cta.corner_radius {
        Some(r) => pixel("cta.cornerRadius", r)?,
        None => cta_h / 2,
    };
    let cta = CtaPlacement {
        x: pixel("cta.x", raw.cta.x)?,
        y: pixel("cta.y", raw.cta.y)?,
        width: cta_w,
        height: cta_h,
        corner_radius: radius.min(cta_w.min(cta_h) / 2),
        background_color: color_or(
            raw.cta.background_color.as_deref(),
            plan.style.accent_color_hex,
        ),
    };

    Ok(CoordinateSet {
        headline,
        tagline,
        cta,
        safe_zones: SafeZones {
            product: zone("safeZones.product", &raw.safe_zones.product)?,
            text: zone("safeZones.text", &raw.safe_zones.text)?,
        },
    })
}

fn text_placement(name: &str, raw: &RawText, fallback_color: HexColor) -> AdResult<TextPlacement> {
    Ok(TextPlacement {
        x: pixel(&format!("{name}.x"), raw.x)?,
        y: pixel(&format!("{name}.y"), raw.y)?,
        max_width: pixel(&format!("{name}.maxWidth"), raw.max_width)?,
        font_size: pixel(&format!("{name}.fontSize"), raw.font_size)?,
        color: color_or(raw.color.as_deref(), fallback_color),
        align: raw.align.unwrap_or_default(),
    })
}

fn zone(name: &str, raw: &RawZone) -> AdResult<Zone> {
    Ok(Zone::new(
        pixel(&format!("{name}.x"), raw.x)?,
        pixel(&format!("{name}.y"), raw.y)?,
        pixel(&format!("{name}.width"), raw.width)?,
        pixel(&format!("{name}.height"), raw.height)?,
    ))
}

/// A finite integral value within `0..=CANVAS_SIZE`.
fn pixel(name: &str, v: f64) -> AdResult<u32> {
    if !v.is_finite() || v.fract() != 0.0 {
        return Err(AdError::parse(format!("{name} is not an integer pixel value: {v}")));
    }
    if v < 0.0 || v > f64::from(CANVAS_SIZE) {
        return Err(AdError::parse(format!("{name} = {v} outside 0..={CANVAS_SIZE}")));
    }
    Ok(v as u32)
}

fn color_or(raw: Option<&str>, fallback: HexColor) -> HexColor {
    raw.and_then(|s| HexColor::parse(s).ok()).unwrap_or(fallback)
}

fn extraction_prompt(plan: &LayoutPlan, copy: &AdCopy) -> String {
    let tagline = copy.tagline.as_deref().unwrap_or("");
    format!(
        "This is a {size}x{size} px advertisement background. Decide where the copy goes so it \
         never covers the product and stays readable.\n\
         Headline: \"{headline}\"\n\
         Tagline: \"{tagline}\"\n\
         Button label: \"{cta}\"\n\
         Preferred copy area: {zone}. Suggested headline size {hs}px, tagline {ts}px.\n\
         Use integer pixels with the origin at the top-left. Text x is the anchor for align and \
         y is the baseline. The button x,y is its top-left corner and it must fit inside the \
         image. Colors are #RRGGBB.\n\
         Answer with JSON only: {{\"headline\": {{\"x\", \"y\", \"maxWidth\", \"fontSize\", \
         \"color\", \"align\"}}, \"tagline\": {{same fields}} or null, \"cta\": {{\"x\", \"y\", \
         \"width\", \"height\", \"cornerRadius\", \"backgroundColor\"}}, \"safeZones\": \
         {{\"product\": {{\"x\", \"y\", \"width\", \"height\"}}, \"text\": {{same fields}}}}}}",
        size = CANVAS_SIZE,
        headline = copy.headline,
        cta = copy.cta,
        zone = plan.composition.negative_space_zone.describe(),
        hs = plan.typography.headline.font_size,
        ts = plan.typography.tagline.font_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        canvas::{SourceKind, fallback::radial_gradient},
        plan::templates::{Industry, StyleTemplate},
    };

    struct Answer(String);

    impl AnalysisModel for Answer {
        fn analyze(&self, _request: &AnalysisRequest) -> AdResult<String> {
            Ok(self.0.clone())
        }
    }

    fn canvas() -> CanvasArtifact {
        let image = radial_gradient(CANVAS_SIZE, HexColor::rgb(20, 20, 40));
        CanvasArtifact::new(image, SourceKind::Generated, false).unwrap()
    }

    fn extract(answer: &str, copy: &AdCopy) -> Staged<CoordinateSet> {
        let plan = StyleTemplate::for_industry(Industry::Gaming).to_plan();
        CoordinateExtractor::new(Arc::new(Answer(answer.to_string())), Duration::from_secs(5))
            .extract(&canvas(), &plan, copy)
    }

    const GOOD: &str = r##"{
        "headline": {"x": 540, "y": 150, "maxWidth": 900, "fontSize": 70, "color": "#ffffff", "align": "center"},
        "tagline": null,
        "cta": {"x": 430, "y": 900, "width": 220, "height": 64, "cornerRadius": 200, "backgroundColor": "nope"},
        "safeZones": {"product": {"x": 0, "y": 300, "width": 1080, "height": 780},
                      "text": {"x": 0, "y": 0, "width": 1080, "height": 300}}
    }"##;

    #[test]
    fn valid_answer_is_used_with_color_and_radius_repairs() {
        let copy = AdCopy::new("Level Up", Some("Play".into()), "Shop Now");
        let staged = extract(GOOD, &copy);
        assert!(!staged.is_fallback());
        let c = staged.into_value();
        assert_eq!(c.headline.y, 150);
        assert_eq!(c.cta.corner_radius, 32);
        assert_eq!(c.cta.background_color, HexColor::rgb(0xFF, 0x00, 0xFF));
        // model omitted the tagline the copy has, so the default slot fills it
        assert!(c.tagline.is_some());
    }

    #[test]
    fn fractional_or_out_of_range_values_fall_back() {
        let copy = AdCopy::new("Level Up", None, "Shop Now");
        for bad in [
            GOOD.replace("\"y\": 150", "\"y\": 150.5"),
            GOOD.replace("\"y\": 150", "\"y\": -3"),
            GOOD.replace("\"x\": 430", "\"x\": 1000"),
            GOOD.replace("\"height\": 64", "\"height\": 0"),
            "no coordinates today".to_string(),
        ] {
            let staged = extract(&bad, &copy);
            assert!(staged.is_fallback(), "accepted {bad}");
            staged.value().validate(CANVAS_SIZE).unwrap();
        }
    }
}
