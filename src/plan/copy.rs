use serde::{Deserialize, Serialize};

use crate::plan::templates::StyleTemplate;

/// Caller-owned ad copy. The pipeline never rewrites real copy; only placeholders are replaced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCopy {
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    pub cta: String,
}

impl AdCopy {
    pub fn new(
        headline: impl Into<String>,
        tagline: Option<String>,
        cta: impl Into<String>,
    ) -> Self {
        Self {
            headline: headline.into(),
            tagline,
            cta: cta.into(),
        }
    }

    /// Replace placeholder values with template defaults.
    ///
    /// A placeholder CTA becomes the template's default label, a placeholder tagline is dropped
    /// and a placeholder headline becomes empty.
    pub fn with_placeholders_filled(&self, template: &StyleTemplate) -> Self {
        let headline = if is_placeholder(&self.headline, &["headline", "title"]) {
            String::new()
        } else {
            self.headline.clone()
        };
        let tagline = self
            .tagline
            .as_ref()
            .filter(|t| !is_placeholder(t, &["tagline", "subheadline", "slogan"]))
            .cloned();
        let cta = if is_placeholder(&self.cta, &["cta", "button", "call to action"]) {
            template.default_cta.to_string()
        } else {
            self.cta.clone()
        };
        Self {
            headline,
            tagline,
            cta,
        }
    }
}

fn is_placeholder(value: &str, names: &[&str]) -> bool {
    let v = value.trim();
    if v.is_empty() {
        return true;
    }
    let wrapped = [('{', '}'), ('[', ']'), ('<', '>')]
        .iter()
        .any(|&(open, close)| v.starts_with(open) && v.ends_with(close));
    if wrapped {
        return true;
    }
    let lower = v.to_lowercase();
    lower == "lorem ipsum"
        || lower == "todo"
        || lower == "tbd"
        || names.iter().any(|name| lower == *name)
}
