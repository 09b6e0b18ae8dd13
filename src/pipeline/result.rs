use serde::Serialize;

use crate::{
    canvas::SourceKind,
    coords::CoordinateSet,
    foundation::staged::StagePath,
    plan::{copy::AdCopy, model::LayoutPlan, templates::Industry},
    quality::QualityResult,
};

/// Outcome of one synthesis → composite → verify round.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub attempt: u32,
    pub canvas_source: SourceKind,
    pub coordinates_source: StagePath,
    /// Absent when verification was skipped.
    pub score: Option<f64>,
    pub gate_passed: bool,
    pub fail_open: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineMetadata {
    pub industry: Industry,
    pub plan: LayoutPlan,
    pub plan_refined: bool,
    pub coordinates: CoordinateSet,
    pub copy: AdCopy,
    pub elapsed_ms: u64,
    pub attempt_count: u32,
    /// Whether the returned artifact met the quality threshold.
    pub gate_passed: bool,
    /// Whether a verifier actually scored the returned artifact.
    pub verified: bool,
    pub canvas_source: SourceKind,
    pub quality: Option<QualityResult>,
    pub attempts: Vec<AttemptRecord>,
}

/// Terminal result handed back to the caller.
#[derive(Clone, Debug)]
pub enum PipelineResult {
    Success {
        /// Canonical square PNG.
        image_png: Vec<u8>,
        metadata: Box<PipelineMetadata>,
    },
    Failure {
        error: String,
    },
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn image_png(&self) -> Option<&[u8]> {
        match self {
            Self::Success { image_png, .. } => Some(image_png),
            Self::Failure { .. } => None,
        }
    }

    pub fn metadata(&self) -> Option<&PipelineMetadata> {
        match self {
            Self::Success { metadata, .. } => Some(metadata),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    /// `{success, metadata}` or `{success: false, error}`; image bytes are not included.
    pub fn summary_json(&self) -> serde_json::Value {
        match self {
            Self::Success { metadata, .. } => serde_json::json!({
                "success": true,
                "metadata": metadata,
            }),
            Self::Failure { error } => serde_json::json!({
                "success": false,
                "error": error,
            }),
        }
    }
}
