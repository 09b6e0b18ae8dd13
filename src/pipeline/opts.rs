use std::{env, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    canvas::SynthesisMode,
    foundation::error::{AdError, AdResult},
};

pub const MAX_ATTEMPTS_LIMIT: u32 = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOpts {
    /// Total synthesis attempts, including the first. Clamped to `1..=5`.
    pub max_attempts: u32,
    pub synthesis_timeout_secs: u64,
    pub analysis_timeout_secs: u64,
    pub mode: SynthesisMode,
    /// Extra font directories for the text renderer, on top of system fonts.
    pub font_dirs: Vec<PathBuf>,
    pub refine_layout: bool,
    pub polish_intent: bool,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            synthesis_timeout_secs: 90,
            analysis_timeout_secs: 45,
            mode: SynthesisMode::CleanCanvas,
            font_dirs: Vec::new(),
            refine_layout: true,
            polish_intent: true,
        }
    }
}

impl PipelineOpts {
    pub fn from_json_str(s: &str) -> AdResult<Self> {
        let opts: Self = serde_json::from_str(s)
            .map_err(|e| AdError::validation(format!("invalid pipeline options: {e}")))?;
        Ok(opts.normalized())
    }

    /// Apply `ADFORGE_MAX_ATTEMPTS`, `ADFORGE_SYNTHESIS_TIMEOUT_SECS` and
    /// `ADFORGE_ANALYSIS_TIMEOUT_SECS` when set.
    pub fn with_env_overrides(mut self) -> AdResult<Self> {
        if let Some(v) = env_u64("ADFORGE_MAX_ATTEMPTS")? {
            self.max_attempts = u32::try_from(v).unwrap_or(MAX_ATTEMPTS_LIMIT);
        }
        if let Some(v) = env_u64("ADFORGE_SYNTHESIS_TIMEOUT_SECS")? {
            self.synthesis_timeout_secs = v;
        }
        if let Some(v) = env_u64("ADFORGE_ANALYSIS_TIMEOUT_SECS")? {
            self.analysis_timeout_secs = v;
        }
        Ok(self.normalized())
    }

    pub fn normalized(mut self) -> Self {
        self.max_attempts = self.max_attempts.clamp(1, MAX_ATTEMPTS_LIMIT);
        self.synthesis_timeout_secs = self.synthesis_timeout_secs.max(1);
        self.analysis_timeout_secs = self.analysis_timeout_secs.max(1);
        self
    }

    pub fn synthesis_timeout(&self) -> Duration {
        Duration::from_secs(self.synthesis_timeout_secs)
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }
}

fn env_u64(key: &str) -> AdResult<Option<u64>> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| {
                AdError::validation(format!("{key} must be a non-negative integer, got {v:?}"))
            }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_defaults_and_clamping() {
        let opts =
            PipelineOpts::from_json_str(r#"{"max_attempts": 12, "mode": "baked_text"}"#).unwrap();
        assert_eq!(opts.max_attempts, MAX_ATTEMPTS_LIMIT);
        assert_eq!(opts.mode, SynthesisMode::BakedText);
        assert_eq!(opts.synthesis_timeout_secs, 90);
        assert!(opts.refine_layout);

        let opts = PipelineOpts::from_json_str(r#"{"max_attempts": 0}"#).unwrap();
        assert_eq!(opts.max_attempts, 1);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = PipelineOpts::from_json_str(r#"{"mode": "watercolor"}"#).unwrap_err();
        assert!(matches!(err, AdError::Validation(_)));
    }

    #[test]
    fn timeouts_never_reach_zero() {
        let opts = PipelineOpts {
            synthesis_timeout_secs: 0,
            analysis_timeout_secs: 0,
            ..PipelineOpts::default()
        }
        .normalized();
        assert_eq!(opts.synthesis_timeout(), Duration::from_secs(1));
        assert_eq!(opts.analysis_timeout(), Duration::from_secs(1));
    }
}
