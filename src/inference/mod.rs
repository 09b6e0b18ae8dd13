//! Client seams for the generative and vision models.
//!
//! Stages receive `Arc<dyn ImageModel>` / `Arc<dyn AnalysisModel>` handles instead of reaching
//! for a process-wide client, so tests substitute scripted implementations.

pub mod gemini;
pub mod json;

use std::{sync::Arc, time::Duration};

use serde::de::DeserializeOwned;

use crate::foundation::{deadline::call_with_deadline, error::AdResult};

/// Image-to-image generation request.
#[derive(Clone, Debug)]
pub struct ImageRequest {
    /// PNG-encoded reference image (the product photo).
    pub reference_png: Vec<u8>,
    /// Natural-language scene description.
    pub prompt: String,
}

/// Vision or text analysis request; the prompt demands a strict JSON answer.
#[derive(Clone, Debug)]
pub struct AnalysisRequest {
    /// PNG-encoded image under analysis, absent for text-only calls.
    pub image_png: Option<Vec<u8>>,
    pub prompt: String,
}

/// A multimodal model that returns an image for a reference image plus prompt.
///
/// A response without an image part is an error.
pub trait ImageModel: Send + Sync {
    fn generate(&self, request: &ImageRequest) -> AdResult<Vec<u8>>;
}

/// A model that answers a prompt (optionally about an image) with text.
pub trait AnalysisModel: Send + Sync {
    fn analyze(&self, request: &AnalysisRequest) -> AdResult<String>;
}

/// Run one image generation under `timeout`.
pub fn generate_with_deadline(
    model: &Arc<dyn ImageModel>,
    request: ImageRequest,
    timeout: Duration,
) -> AdResult<Vec<u8>> {
    let model = Arc::clone(model);
    call_with_deadline("image-generation", timeout, move || model.generate(&request))
}

/// Run one analysis call under `timeout` and deserialize the JSON object in its answer.
///
/// Transport failures, timeouts, missing JSON and schema mismatches all come back as `Err`.
pub fn analyze_json_with_deadline<T>(
    model: &Arc<dyn AnalysisModel>,
    request: AnalysisRequest,
    timeout: Duration,
) -> AdResult<T>
where
    T: DeserializeOwned,
{
    let model = Arc::clone(model);
    let raw = call_with_deadline("analysis", timeout, move || model.analyze(&request))?;
    json::parse_json_object(&raw)
}
