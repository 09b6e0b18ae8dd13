//! Post-composite verification: scoring, defect detection and the accept/regenerate decision.

pub mod gate;

use serde::{Deserialize, Serialize};

/// Minimum overall score for an artifact to be accepted.
pub const GATE_THRESHOLD: f64 = 8.0;

/// Visual defect reported by the verifier. Each maps to one corrective synthesis instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Defect {
    RectangleGlyphArtifact,
    BlurredText,
    HeadlineUnreadable,
    CtaNotVisible,
    LowLegibility,
    LowSharpness,
    LowProductFidelity,
    LowProfessionalism,
}

impl Defect {
    pub fn corrective_instruction(self) -> &'static str {
        match self {
            Self::RectangleGlyphArtifact => {
                "No placeholder rectangles or boxes anywhere; render true characters only."
            }
            Self::BlurredText => {
                "Keep every edge crisp; no motion blur or soft focus near the copy area."
            }
            Self::HeadlineUnreadable => {
                "Leave the headline area clean and high-contrast with no busy texture behind it."
            }
            Self::CtaNotVisible => "Keep the lower copy area uncluttered so the button stands out.",
            Self::LowLegibility => "Increase contrast between the background and the copy area.",
            Self::LowSharpness => "Render at full sharpness with clean, well-defined edges.",
            Self::LowProductFidelity => {
                "Reproduce the product exactly as in the reference: same shape, colors, labels \
                 and proportions."
            }
            Self::LowProfessionalism => {
                "Aim for a polished studio-grade commercial look with balanced composition."
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscores {
    pub text_legibility: f64,
    pub text_sharpness: f64,
    pub product_quality: f64,
    pub professional_quality: f64,
}

impl Subscores {
    pub fn mean(&self) -> f64 {
        let sum = self.text_legibility
            + self.text_sharpness
            + self.product_quality
            + self.professional_quality;
        sum / 4.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Approve,
    Regenerate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityResult {
    /// 0..=10 after caps.
    pub overall_score: f64,
    /// Absent when the verifier could not be reached.
    pub subscores: Option<Subscores>,
    pub passes_gate: bool,
    pub defects: Vec<Defect>,
    pub recommendation: Recommendation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    /// Set when verification failed and the gate passed the artifact unseen.
    pub fail_open: bool,
}

impl QualityResult {
    pub fn fail_open() -> Self {
        Self {
            overall_score: GATE_THRESHOLD,
            subscores: None,
            passes_gate: true,
            defects: Vec::new(),
            recommendation: Recommendation::Approve,
            issues: Vec::new(),
            fail_open: true,
        }
    }
}
