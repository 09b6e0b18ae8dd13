use serde::Serialize;

/// Output of a stage that has an AI primary path and a deterministic fallback.
///
/// Stages never surface their own external-service failures; they hand back which path produced
/// the value so the orchestrator can branch on data instead of on error control flow.
#[derive(Clone, Debug)]
pub enum Staged<T> {
    Generated(T),
    Fallback { value: T, reason: String },
}

/// Which path produced a [`Staged`] value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePath {
    Generated,
    Fallback,
}

impl<T> Staged<T> {
    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        Self::Fallback {
            value,
            reason: reason.into(),
        }
    }

    pub fn path(&self) -> StagePath {
        match self {
            Self::Generated(_) => StagePath::Generated,
            Self::Fallback { .. } => StagePath::Fallback,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Generated(v) | Self::Fallback { value: v, .. } => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Generated(v) | Self::Fallback { value: v, .. } => v,
        }
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Self::Generated(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_expose_value_on_both_paths() {
        let a = Staged::Generated(3);
        let b = Staged::fallback(4, "model unavailable");
        assert_eq!(*a.value(), 3);
        assert_eq!(a.path(), StagePath::Generated);
        assert!(a.fallback_reason().is_none());

        assert_eq!(b.path(), StagePath::Fallback);
        assert_eq!(b.fallback_reason(), Some("model unavailable"));
        assert_eq!(b.into_value(), 4);
    }
}
