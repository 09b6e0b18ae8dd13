use std::{sync::Arc, time::Duration};

use image::{DynamicImage, RgbaImage, imageops::FilterType};

use crate::{
    canvas::{
        CanvasArtifact, SourceKind, SynthesisMode,
        decode::{decode_rgba, flatten_onto},
        fallback::compose_fallback,
        prompt::{SceneBrief, scene_description, with_corrections},
    },
    foundation::{
        core::{CANVAS_SIZE, HexColor},
        error::AdResult,
        staged::Staged,
    },
    inference::{ImageModel, ImageRequest, generate_with_deadline},
    quality::Defect,
};

/// One synthesis attempt's inputs.
pub struct SynthesisJob<'a> {
    pub product: &'a RgbaImage,
    /// PNG encoding of `product`, sent as the model's reference image.
    pub product_png: &'a [u8],
    pub brief: SceneBrief<'a>,
    /// Defects reported for the previous attempt; empty on the first.
    pub corrections: &'a [Defect],
    pub attempt: u32,
}

pub struct CanvasSynthesizer {
    model: Arc<dyn ImageModel>,
    timeout: Duration,
}

impl CanvasSynthesizer {
    pub fn new(model: Arc<dyn ImageModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Generate the scene, or build the fallback composite when generation fails.
    ///
    /// Only an inconsistent fallback (never expected for a decoded product) is an `Err`.
    #[tracing::instrument(skip_all, fields(attempt = job.attempt, mode = ?job.brief.mode))]
    pub fn synthesize(&self, job: &SynthesisJob<'_>) -> AdResult<Staged<CanvasArtifact>> {
        let prompt = with_corrections(&scene_description(&job.brief), job.corrections, job.attempt);
        let request = ImageRequest {
            reference_png: job.product_png.to_vec(),
            prompt,
        };

        let backdrop = job.brief.plan.style.background_color_hex;
        let generated = generate_with_deadline(&self.model, request, self.timeout)
            .and_then(|bytes| normalize_generated(&bytes, backdrop))
            .and_then(|image| {
                CanvasArtifact::new(
                    image,
                    SourceKind::Generated,
                    job.brief.mode == SynthesisMode::BakedText,
                )
            });

        match generated {
            Ok(canvas) => {
                tracing::info!(baked_text = canvas.includes_baked_text, "canvas generated");
                Ok(Staged::Generated(canvas))
            }
            Err(e) => {
                tracing::warn!(error = %e, "canvas generation failed, composing fallback");
                let canvas = compose_fallback(job.product, job.brief.plan)?;
                Ok(Staged::fallback(canvas, e.to_string()))
            }
        }
    }
}

/// Decode a model image and bring it to an opaque canonical square (center crop on aspect
/// mismatch).
pub fn normalize_generated(bytes: &[u8], backdrop: HexColor) -> AdResult<RgbaImage> {
    let mut img = decode_rgba(bytes)?;
    flatten_onto(&mut img, backdrop);
    if img.dimensions() == (CANVAS_SIZE, CANVAS_SIZE) {
        return Ok(img);
    }
    Ok(DynamicImage::ImageRgba8(img)
        .resize_to_fill(CANVAS_SIZE, CANVAS_SIZE, FilterType::Lanczos3)
        .to_rgba8())
}
