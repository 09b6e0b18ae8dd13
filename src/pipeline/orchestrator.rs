use std::{fmt, sync::Arc, time::Instant};

use image::RgbaImage;

use crate::{
    canvas::{
        CanvasArtifact,
        decode::{decode_rgba, encode_png},
        prompt::SceneBrief,
        synthesizer::{CanvasSynthesizer, SynthesisJob},
    },
    coords::{CoordinateSet, defaults::default_coordinates, extractor::CoordinateExtractor},
    foundation::{
        core::CANVAS_SIZE,
        error::AdResult,
        staged::{StagePath, Staged},
    },
    inference::{AnalysisModel, ImageModel},
    pipeline::{
        opts::PipelineOpts,
        result::{AttemptRecord, PipelineMetadata, PipelineResult},
    },
    plan::{
        copy::AdCopy,
        model::LayoutPlan,
        strategist::LayoutStrategist,
        templates::{Industry, StyleTemplate},
    },
    quality::{Defect, QualityResult, gate::QualityGate},
    render::compositor::TextCompositor,
};

/// Caller input for one ad.
#[derive(Clone, Debug, Default)]
pub struct AdRequest {
    /// Encoded product photo (PNG, JPEG, WebP, ...).
    pub product_image: Vec<u8>,
    pub product_description: String,
    pub intent: String,
    pub industry: Option<String>,
    pub headline: Option<String>,
    pub tagline: Option<String>,
    pub cta: Option<String>,
}

impl AdRequest {
    fn copy(&self) -> AdCopy {
        AdCopy::new(
            self.headline.clone().unwrap_or_default(),
            self.tagline.clone(),
            self.cta.clone().unwrap_or_default(),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Planning,
    Synthesizing,
    Extracting,
    Compositing,
    Verifying,
    Regenerating,
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Planning => "PLANNING",
            Self::Synthesizing => "SYNTHESIZING",
            Self::Extracting => "EXTRACTING",
            Self::Compositing => "COMPOSITING",
            Self::Verifying => "VERIFYING",
            Self::Regenerating => "REGENERATING",
            Self::Done => "DONE",
        })
    }
}

fn enter(state: PipelineState, attempt: u32) {
    tracing::debug!(%state, attempt, "pipeline state");
}

/// Everything decided once per request, before the attempt loop.
struct Prepared {
    industry: Industry,
    plan: LayoutPlan,
    plan_refined: bool,
    copy: AdCopy,
    product_description: String,
    direction: String,
    product: RgbaImage,
    product_png: Vec<u8>,
}

/// A composited candidate and how it came to be.
struct Candidate {
    image_png: Vec<u8>,
    canvas: CanvasArtifact,
    coords: CoordinateSet,
    quality: Option<QualityResult>,
}

impl Candidate {
    fn score(&self) -> f64 {
        self.quality.as_ref().map_or(0.0, |q| q.overall_score)
    }
}

/// The ad-creative pipeline. Holds injected model handles and the shared font database;
/// every request is otherwise independent.
pub struct AdPipeline {
    opts: PipelineOpts,
    strategist: LayoutStrategist,
    synthesizer: CanvasSynthesizer,
    extractor: CoordinateExtractor,
    compositor: TextCompositor,
    gate: QualityGate,
}

impl AdPipeline {
    pub fn new(
        image_model: Arc<dyn ImageModel>,
        analysis_model: Arc<dyn AnalysisModel>,
        opts: PipelineOpts,
    ) -> Self {
        let opts = opts.normalized();
        let analysis_timeout = opts.analysis_timeout();
        Self {
            strategist: LayoutStrategist::new(Arc::clone(&analysis_model), analysis_timeout),
            synthesizer: CanvasSynthesizer::new(image_model, opts.synthesis_timeout()),
            extractor: CoordinateExtractor::new(Arc::clone(&analysis_model), analysis_timeout),
            compositor: TextCompositor::new(&opts.font_dirs),
            gate: QualityGate::new(analysis_model, analysis_timeout),
            opts,
        }
    }

    pub fn opts(&self) -> &PipelineOpts {
        &self.opts
    }

    /// Full pipeline with coordinate extraction and quality-gated regeneration.
    ///
    /// Returns `Failure` only for an undecodable product image or a compositing error.
    #[tracing::instrument(skip_all, fields(industry = request.industry.as_deref().unwrap_or("")))]
    pub fn run(&self, request: &AdRequest) -> PipelineResult {
        let started = Instant::now();
        finish(self.run_full(request, started), "run")
    }

    /// Lower-latency variant: template plan, one synthesis, default coordinates, no verification.
    #[tracing::instrument(skip_all, fields(industry = request.industry.as_deref().unwrap_or("")))]
    pub fn run_quick(&self, request: &AdRequest) -> PipelineResult {
        let started = Instant::now();
        finish(self.run_fast(request, started), "run_quick")
    }

    /// `full` enables the model-backed planning steps allowed by the options.
    fn prepare(&self, request: &AdRequest, full: bool) -> AdResult<Prepared> {
        enter(PipelineState::Planning, 0);
        let product = decode_rgba(&request.product_image)?;
        let product_png = encode_png(&product)?;

        let industry = Industry::from_key(request.industry.as_deref());
        let template = StyleTemplate::for_industry(industry);
        let copy = request.copy().with_placeholders_filled(template);

        let (plan, plan_refined) = if full && self.opts.refine_layout {
            let staged = self
                .strategist
                .plan(industry, &request.product_description, &request.intent);
            let refined = staged.path() == StagePath::Generated;
            (staged.into_value(), refined)
        } else {
            (LayoutStrategist::template_plan(industry), false)
        };

        let direction = if full && self.opts.polish_intent {
            self.strategist
                .polish_intent(&request.product_description, &request.intent)
                .into_value()
        } else {
            request.intent.clone()
        };

        tracing::info!(
            industry = industry.key(),
            mood = ?plan.style.mood,
            plan_refined,
            "plan ready"
        );
        Ok(Prepared {
            industry,
            plan,
            plan_refined,
            copy,
            product_description: request.product_description.clone(),
            direction,
            product,
            product_png,
        })
    }

    fn synthesize(
        &self,
        prep: &Prepared,
        corrections: &[Defect],
        attempt: u32,
    ) -> AdResult<CanvasArtifact> {
        enter(PipelineState::Synthesizing, attempt);
        let job = SynthesisJob {
            product: &prep.product,
            product_png: &prep.product_png,
            brief: SceneBrief {
                plan: &prep.plan,
                product_description: &prep.product_description,
                direction: &prep.direction,
                copy: &prep.copy,
                mode: self.opts.mode,
            },
            corrections,
            attempt,
        };
        match self.synthesizer.synthesize(&job)? {
            Staged::Generated(canvas) => Ok(canvas),
            Staged::Fallback { value, reason } => {
                tracing::info!(attempt, %reason, "continuing with fallback composite");
                Ok(value)
            }
        }
    }

    fn composite(
        &self,
        prep: &Prepared,
        canvas: &CanvasArtifact,
        coords: &CoordinateSet,
        attempt: u32,
    ) -> AdResult<Vec<u8>> {
        enter(PipelineState::Compositing, attempt);
        let image = self.compositor.compose(canvas, coords, &prep.copy, &prep.plan)?;
        encode_png(&image)
    }

    fn run_full(&self, request: &AdRequest, started: Instant) -> AdResult<PipelineResult> {
        let prep = self.prepare(request, true)?;

        let mut attempts = Vec::new();
        let mut best: Option<Candidate> = None;
        let mut corrections: Vec<Defect> = Vec::new();

        for attempt in 1..=self.opts.max_attempts {
            if attempt > 1 {
                enter(PipelineState::Regenerating, attempt);
            }
            let canvas = self.synthesize(&prep, &corrections, attempt)?;

            enter(PipelineState::Extracting, attempt);
            let staged_coords = self.extractor.extract(&canvas, &prep.plan, &prep.copy);
            let coordinates_source = staged_coords.path();
            let coords = TextCompositor::stack(
                &staged_coords.into_value(),
                &prep.copy,
                &prep.plan,
                canvas.size(),
            );

            let image_png = self.composite(&prep, &canvas, &coords, attempt)?;

            enter(PipelineState::Verifying, attempt);
            let quality = self.gate.verify(&image_png, &prep.copy).into_value();

            attempts.push(AttemptRecord {
                attempt,
                canvas_source: canvas.source_kind,
                coordinates_source,
                score: Some(quality.overall_score),
                gate_passed: quality.passes_gate,
                fail_open: quality.fail_open,
            });

            let passed = quality.passes_gate;
            corrections = quality.defects.clone();
            let candidate = Candidate {
                image_png,
                canvas,
                coords,
                quality: Some(quality),
            };
            if best.as_ref().is_none_or(|b| candidate.score() > b.score()) {
                best = Some(candidate);
            }

            if passed {
                break;
            }
            tracing::info!(attempt, defects = ?corrections, "quality gate rejected attempt");
        }
        enter(PipelineState::Done, attempts.len() as u32);

        let Some(best) = best else {
            return Ok(PipelineResult::Failure {
                error: "no attempt was made".to_string(),
            });
        };
        let gate_passed = best.quality.as_ref().is_some_and(|q| q.passes_gate);
        let verified = best.quality.as_ref().is_some_and(|q| !q.fail_open);
        Ok(success(prep, best, attempts, gate_passed, verified, started))
    }

    fn run_fast(&self, request: &AdRequest, started: Instant) -> AdResult<PipelineResult> {
        let prep = self.prepare(request, false)?;

        let canvas = self.synthesize(&prep, &[], 1)?;
        let coords = TextCompositor::stack(
            &default_coordinates(&prep.plan, &prep.copy),
            &prep.copy,
            &prep.plan,
            canvas.size(),
        );
        let image_png = self.composite(&prep, &canvas, &coords, 1)?;
        enter(PipelineState::Done, 1);

        let attempts = vec![AttemptRecord {
            attempt: 1,
            canvas_source: canvas.source_kind,
            coordinates_source: StagePath::Fallback,
            score: None,
            gate_passed: false,
            fail_open: false,
        }];
        let candidate = Candidate {
            image_png,
            canvas,
            coords,
            quality: None,
        };
        Ok(success(prep, candidate, attempts, false, false, started))
    }
}

fn success(
    prep: Prepared,
    best: Candidate,
    attempts: Vec<AttemptRecord>,
    gate_passed: bool,
    verified: bool,
    started: Instant,
) -> PipelineResult {
    debug_assert_eq!(best.canvas.size(), CANVAS_SIZE);
    let metadata = PipelineMetadata {
        industry: prep.industry,
        plan: prep.plan,
        plan_refined: prep.plan_refined,
        coordinates: best.coords,
        copy: prep.copy,
        elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        attempt_count: attempts.len() as u32,
        gate_passed,
        verified,
        canvas_source: best.canvas.source_kind,
        quality: best.quality,
        attempts,
    };
    PipelineResult::Success {
        image_png: best.image_png,
        metadata: Box::new(metadata),
    }
}

fn finish(result: AdResult<PipelineResult>, entry: &str) -> PipelineResult {
    match result {
        Ok(r) => {
            if let Some(m) = r.metadata() {
                tracing::info!(
                    entry,
                    attempts = m.attempt_count,
                    gate_passed = m.gate_passed,
                    canvas = ?m.canvas_source,
                    elapsed_ms = m.elapsed_ms,
                    "pipeline done"
                );
            }
            r
        }
        Err(e) => {
            tracing::error!(entry, error = %e, "pipeline failed");
            PipelineResult::Failure {
                error: e.to_string(),
            }
        }
    }
}
