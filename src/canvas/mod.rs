//! Canvas synthesis: the generated scene, or the deterministic fallback composite.

pub mod decode;
pub mod fallback;
pub mod prompt;
pub mod synthesizer;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::CANVAS_SIZE,
    error::{AdError, AdResult},
};

/// Which path produced a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Generated,
    FallbackComposite,
}

/// Whether the generative model is asked to paint the copy itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisMode {
    #[default]
    CleanCanvas,
    BakedText,
}

/// An opaque `CANVAS_SIZE`×`CANVAS_SIZE` scene, superseded on every regeneration attempt.
#[derive(Clone, Debug)]
pub struct CanvasArtifact {
    pub image: RgbaImage,
    pub source_kind: SourceKind,
    pub includes_baked_text: bool,
}

impl CanvasArtifact {
    pub fn new(
        image: RgbaImage,
        source_kind: SourceKind,
        includes_baked_text: bool,
    ) -> AdResult<Self> {
        let (w, h) = image.dimensions();
        if w != CANVAS_SIZE || h != CANVAS_SIZE {
            return Err(AdError::geometry(format!(
                "canvas must be {CANVAS_SIZE}x{CANVAS_SIZE}, got {w}x{h}"
            )));
        }
        Ok(Self {
            image,
            source_kind,
            includes_baked_text,
        })
    }

    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn to_png(&self) -> AdResult<Vec<u8>> {
        decode::encode_png(&self.image)
    }
}
