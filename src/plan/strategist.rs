use std::{sync::Arc, time::Duration};

use serde::Deserialize;

use crate::{
    foundation::{error::AdResult, staged::Staged},
    inference::{AnalysisModel, AnalysisRequest, analyze_json_with_deadline},
    plan::{
        model::{Effect, LayoutPlan, LayoutType, NegativeSpaceZone, ProductPosition},
        templates::{Industry, StyleTemplate},
    },
};

/// Composition-level fields a refinement answer may override. Anything absent keeps the
/// template value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Refinement {
    #[serde(default)]
    layout_type: Option<LayoutType>,
    #[serde(default)]
    composition: Option<CompositionRefinement>,
    #[serde(default)]
    effects: Vec<Effect>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompositionRefinement {
    #[serde(default)]
    product_position: Option<ProductPosition>,
    #[serde(default)]
    product_size_fraction: Option<f64>,
    #[serde(default)]
    negative_space_zone: Option<NegativeSpaceZone>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PolishedIntent {
    scene_direction: String,
}

/// Picks the layout plan for a request: industry template first, optional model refinement on
/// top. Never fails; every failure path hands back the template.
pub struct LayoutStrategist {
    model: Arc<dyn AnalysisModel>,
    timeout: Duration,
}

impl LayoutStrategist {
    pub fn new(model: Arc<dyn AnalysisModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    pub fn template_plan(industry: Industry) -> LayoutPlan {
        StyleTemplate::for_industry(industry).to_plan()
    }

    #[tracing::instrument(skip(self, product_description, intent))]
    pub fn plan(
        &self,
        industry: Industry,
        product_description: &str,
        intent: &str,
    ) -> Staged<LayoutPlan> {
        let template = Self::template_plan(industry);
        let prompt = refinement_prompt(industry, &template, product_description, intent);

        let refined = analyze_json_with_deadline::<Refinement>(
            &self.model,
            AnalysisRequest {
                image_png: None,
                prompt,
            },
            self.timeout,
        )
        .and_then(|r| merge_refinement(&template, r));

        match refined {
            Ok(plan) => {
                tracing::debug!(layout = ?plan.layout_type, "layout refinement merged");
                Staged::Generated(plan)
            }
            Err(e) => {
                tracing::warn!(error = %e, "layout refinement failed, using template");
                Staged::fallback(template, e.to_string())
            }
        }
    }

    /// Rewrite the free-form intent into a richer scene direction. Falls back to the raw intent.
    #[tracing::instrument(skip_all)]
    pub fn polish_intent(&self, product_description: &str, intent: &str) -> Staged<String> {
        let prompt = format!(
            "You are an art director. Rewrite the advertiser's request into one or two sentences \
             of concrete visual scene direction for a product photo advertisement.\n\
             Product: {product_description}\n\
             Request: {intent}\n\
             Do not invent slogans or on-image text.\n\
             Answer with JSON only: {{\"sceneDirection\": \"...\"}}"
        );
        let polished = analyze_json_with_deadline::<PolishedIntent>(
            &self.model,
            AnalysisRequest {
                image_png: None,
                prompt,
            },
            self.timeout,
        );

        match polished {
            Ok(p) if !p.scene_direction.trim().is_empty() => {
                Staged::Generated(p.scene_direction.trim().to_string())
            }
            Ok(_) => Staged::fallback(intent.to_string(), "empty scene direction"),
            Err(e) => {
                tracing::warn!(error = %e, "intent polish failed, using raw intent");
                Staged::fallback(intent.to_string(), e.to_string())
            }
        }
    }
}

/// Apply a refinement to the template. Style and typography are never replaced; effects can
/// only be added.
fn merge_refinement(template: &LayoutPlan, refinement: Refinement) -> AdResult<LayoutPlan> {
    let mut plan = template.clone();
    if let Some(layout_type) = refinement.layout_type {
        plan.layout_type = layout_type;
    }
    if let Some(c) = refinement.composition {
        if let Some(p) = c.product_position {
            plan.composition.product_position = p;
        }
        if let Some(f) = c.product_size_fraction {
            plan.composition.product_size_fraction = f;
        }
        if let Some(z) = c.negative_space_zone {
            plan.composition.negative_space_zone = z;
        }
    }
    plan.style.effects.extend(refinement.effects);
    plan.validate()?;
    Ok(plan)
}

fn refinement_prompt(
    industry: Industry,
    template: &LayoutPlan,
    product_description: &str,
    intent: &str,
) -> String {
    let c = &template.composition;
    format!(
        "You plan the composition of a square {industry} product advertisement.\n\
         Product: {product_description}\n\
         Advertiser intent: {intent}\n\
         Current plan: layout {layout:?}, product {position:?} at {fraction:.2} of the frame, \
         copy space at the {zone:?}.\n\
         You may adjust layoutType (hero_product | feature_callouts | left_hero | lifestyle), \
         composition.productPosition (center | left | right | top | bottom), \
         composition.productSizeFraction (0.2 to 0.9), composition.negativeSpaceZone \
         (top | bottom | left | right) and add effects (glow | bokeh | particles | lens_flare | \
         soft_shadow | reflection | grain).\n\
         Answer with JSON only, omitting anything you keep unchanged: \
         {{\"layoutType\": ..., \"composition\": {{...}}, \"effects\": [...]}}",
        industry = industry.key(),
        layout = template.layout_type,
        position = c.product_position,
        fraction = c.product_size_fraction,
        zone = c.negative_space_zone,
    )
}
