//! adforge turns a product photo and a short brief into a finished square advertisement.
//!
//! A request flows through a fixed chain of stages:
//!
//! - plan the layout from an industry template, optionally refined by a model
//! - synthesize the scene with an image model, or compose a deterministic fallback
//! - place the copy with a vision model, or use rule-based coordinates
//! - composite sanitized text overlays deterministically
//! - verify the result and regenerate, a bounded number of times, when it falls short
//!
//! Model access goes through the [`ImageModel`] and [`AnalysisModel`] traits; [`GeminiClient`]
//! implements both.
#![forbid(unsafe_code)]

pub mod canvas;
pub mod coords;
pub mod foundation;
pub mod inference;
pub mod pipeline;
pub mod plan;
pub mod quality;
pub mod render;

pub use crate::canvas::{CanvasArtifact, SourceKind, SynthesisMode};
pub use crate::coords::{CoordinateSet, CtaPlacement, SafeZones, TextAlign, TextPlacement};
pub use crate::foundation::core::{CANVAS_SIZE, HexColor, Zone};
pub use crate::foundation::error::{AdError, AdResult};
pub use crate::foundation::staged::{StagePath, Staged};
pub use crate::inference::gemini::{GeminiClient, GeminiConfig};
pub use crate::inference::{AnalysisModel, AnalysisRequest, ImageModel, ImageRequest};
pub use crate::pipeline::opts::PipelineOpts;
pub use crate::pipeline::orchestrator::{AdPipeline, AdRequest, PipelineState};
pub use crate::pipeline::result::{AttemptRecord, PipelineMetadata, PipelineResult};
pub use crate::plan::copy::AdCopy;
pub use crate::plan::model::{
    BackgroundType, Composition, Effect, LayoutPlan, LayoutType, Lighting, Mood,
    NegativeSpaceZone, ProductPosition, Style, TextStyle, Typography,
};
pub use crate::plan::templates::{Industry, StyleTemplate};
pub use crate::quality::{Defect, QualityResult, Recommendation, Subscores};
pub use crate::render::sanitize::sanitize_text;
