use std::collections::BTreeSet;

use crate::{
    canvas::SynthesisMode,
    plan::{copy::AdCopy, model::LayoutPlan},
    quality::Defect,
    render::sanitize::sanitize_text,
};

/// Everything the scene description is derived from.
pub struct SceneBrief<'a> {
    pub plan: &'a LayoutPlan,
    pub product_description: &'a str,
    pub direction: &'a str,
    pub copy: &'a AdCopy,
    pub mode: SynthesisMode,
}

pub fn scene_description(brief: &SceneBrief<'_>) -> String {
    let plan = brief.plan;
    let style = &plan.style;
    let comp = &plan.composition;

    let effects = style
        .effects
        .iter()
        .map(|e| e.describe())
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = format!(
        "Create a square professional product advertisement photograph using the product in the \
         reference image.\n\
         Product: {product}\n\
         Direction: {direction}\n\
         Layout: {layout}. Product {position}, filling about {pct}% of the frame.\n\
         Background: {background}, dominant color {bg}, accent color {accent}.\n\
         Mood: {mood}. Lighting: {lighting}.\n",
        product = brief.product_description.trim(),
        direction = brief.direction.trim(),
        layout = plan.layout_type.describe(),
        position = comp.product_position.describe(),
        pct = (comp.product_size_fraction * 100.0).round(),
        background = style.background_type.describe(),
        bg = style.background_color_hex,
        accent = style.accent_color_hex,
        mood = style.mood.describe(),
        lighting = style.lighting.describe(),
    );
    if !effects.is_empty() {
        out.push_str(&format!("Effects: {effects}.\n"));
    }
    out.push_str("Keep the product identical to the reference: same shape, colors and labels.\n");

    match brief.mode {
        SynthesisMode::CleanCanvas => {
            out.push_str(&format!(
                "Leave the {zone} area calm and empty for copy added later. \
                 Do not render any text, letters, logos, buttons or watermarks.",
                zone = comp.negative_space_zone.describe(),
            ));
        }
        SynthesisMode::BakedText => {
            let headline = sanitize_text(&brief.copy.headline);
            let cta = sanitize_text(&brief.copy.cta);
            out.push_str(&format!(
                "Place the copy in the {zone} area, spelled exactly as given, in a clean bold \
                 sans-serif:\n",
                zone = comp.negative_space_zone.describe(),
            ));
            if !headline.is_empty() {
                out.push_str(&format!("Headline: \"{headline}\"\n"));
            }
            if let Some(tagline) = brief.copy.tagline.as_deref().map(sanitize_text)
                && !tagline.is_empty()
            {
                out.push_str(&format!("Tagline: \"{tagline}\"\n"));
            }
            out.push_str(&format!(
                "Button: a rounded {accent} button labelled \"{cta}\".\n\
                 No other text.",
                accent = style.accent_color_hex,
            ));
        }
    }
    out
}

/// Append one instruction per distinct defect, in a stable order, plus the attempt number.
pub fn with_corrections(base: &str, defects: &[Defect], attempt: u32) -> String {
    if defects.is_empty() {
        return base.to_string();
    }
    let unique: BTreeSet<Defect> = defects.iter().copied().collect();
    let mut out = format!("{base}\n\nAttempt {attempt}. The previous attempt was rejected. Fix:\n");
    for defect in unique {
        out.push_str("- ");
        out.push_str(defect.corrective_instruction());
        out.push('\n');
    }
    out
}
