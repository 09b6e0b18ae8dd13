use std::{sync::Arc, time::Duration};

use serde::Deserialize;

use crate::{
    foundation::staged::Staged,
    inference::{AnalysisModel, AnalysisRequest, analyze_json_with_deadline},
    plan::copy::AdCopy,
    quality::{Defect, GATE_THRESHOLD, QualityResult, Recommendation, Subscores},
};

const RECTANGLE_ARTIFACT_CAP: f64 = 4.0;
const UNREADABLE_HEADLINE_CAP: f64 = 5.0;
const LOW_SUBSCORE: f64 = 6.0;

/// Verifier answer as the model reports it, before caps are applied.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVerdict {
    pub text_legibility: f64,
    pub text_sharpness: f64,
    pub product_quality: f64,
    pub professional_quality: f64,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub rectangle_artifacts_detected: bool,
    #[serde(default)]
    pub blurred_text: bool,
    #[serde(default = "yes")]
    pub headline_readable: bool,
    #[serde(default = "yes")]
    pub cta_visible: bool,
    #[serde(default)]
    pub issues: Vec<String>,
}

fn yes() -> bool {
    true
}

pub struct QualityGate {
    model: Arc<dyn AnalysisModel>,
    timeout: Duration,
}

impl QualityGate {
    pub fn new(model: Arc<dyn AnalysisModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Score a finished ad. A verifier that cannot be reached or answers garbage fails open.
    #[tracing::instrument(skip_all, fields(bytes = image_png.len()))]
    pub fn verify(&self, image_png: &[u8], copy: &AdCopy) -> Staged<QualityResult> {
        let verdict = analyze_json_with_deadline::<RawVerdict>(
            &self.model,
            AnalysisRequest {
                image_png: Some(image_png.to_vec()),
                prompt: verification_prompt(copy),
            },
            self.timeout,
        );

        match verdict {
            Ok(raw) => {
                let result = score_verdict(raw, !copy.headline.trim().is_empty());
                tracing::info!(
                    score = result.overall_score,
                    passes = result.passes_gate,
                    defects = ?result.defects,
                    "quality verdict"
                );
                Staged::Generated(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "quality gate unreachable, failing open");
                Staged::fallback(QualityResult::fail_open(), e.to_string())
            }
        }
    }
}

/// Turn a raw verdict into a gated result. Caps always override the model's own score.
pub fn score_verdict(raw: RawVerdict, expects_headline: bool) -> QualityResult {
    let subscores = Subscores {
        text_legibility: clamp_score(raw.text_legibility),
        text_sharpness: clamp_score(raw.text_sharpness),
        product_quality: clamp_score(raw.product_quality),
        professional_quality: clamp_score(raw.professional_quality),
    };

    let mut score = clamp_score(raw.overall_score.unwrap_or_else(|| subscores.mean()));
    let mut defects = Vec::new();

    if raw.rectangle_artifacts_detected {
        score = score.min(RECTANGLE_ARTIFACT_CAP);
        defects.push(Defect::RectangleGlyphArtifact);
    }
    if raw.blurred_text {
        defects.push(Defect::BlurredText);
    }
    if expects_headline && !raw.headline_readable {
        score = score.min(UNREADABLE_HEADLINE_CAP);
        defects.push(Defect::HeadlineUnreadable);
    }
    if !raw.cta_visible {
        defects.push(Defect::CtaNotVisible);
    }
    for (value, defect) in [
        (subscores.text_legibility, Defect::LowLegibility),
        (subscores.text_sharpness, Defect::LowSharpness),
        (subscores.product_quality, Defect::LowProductFidelity),
        (subscores.professional_quality, Defect::LowProfessionalism),
    ] {
        if value < LOW_SUBSCORE {
            defects.push(defect);
        }
    }

    let passes_gate = score >= GATE_THRESHOLD;
    QualityResult {
        overall_score: score,
        subscores: Some(subscores),
        passes_gate,
        defects,
        recommendation: if passes_gate {
            Recommendation::Approve
        } else {
            Recommendation::Regenerate
        },
        issues: raw.issues,
        fail_open: false,
    }
}

fn clamp_score(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 10.0) } else { 0.0 }
}

fn verification_prompt(copy: &AdCopy) -> String {
    let tagline = copy.tagline.as_deref().unwrap_or("(none)");
    format!(
        "You are a strict advertising quality inspector. Inspect this finished ad image.\n\
         Expected headline: \"{headline}\"\n\
         Expected tagline: \"{tagline}\"\n\
         Expected button label: \"{cta}\"\n\
         Score each dimension from 1 to 10: textLegibility, textSharpness, productQuality \
         (is the product rendered faithfully and undistorted), professionalQuality.\n\
         Flag rectangleArtifactsDetected if any text shows filled boxes or tofu glyphs instead of \
         letters, blurredText if any text is soft or smeared, headlineReadable if the expected \
         headline can be read exactly, ctaVisible if the button is clearly visible.\n\
         Answer with JSON only: {{\"textLegibility\": n, \"textSharpness\": n, \
         \"productQuality\": n, \"professionalQuality\": n, \"overallScore\": n, \
         \"rectangleArtifactsDetected\": bool, \"blurredText\": bool, \"headlineReadable\": bool, \
         \"ctaVisible\": bool, \"issues\": [\"...\"]}}",
        headline = copy.headline,
        cta = copy.cta,
    )
}
