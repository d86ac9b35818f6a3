use std::str::FromStr;

use crate::foundation::error::{TimelineError, TimelineResult};

/// Render strategy used between two consecutively displayed frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Cross-fade from one frame to the other.
    #[default]
    Fade,
    /// Outgoing frame slides off to the left while the incoming one enters from the right.
    Slide,
    /// Per-pixel stochastic reveal of the incoming frame.
    Dissolve,
    /// Cut without animation.
    None,
}

impl TransitionKind {
    /// `true` when requests should render the target directly.
    pub fn is_cut(self) -> bool {
        self == Self::None
    }
}

pub fn parse_transition(kind: &str) -> TimelineResult<TransitionKind> {
    let kind = kind.trim().to_ascii_lowercase();
    if kind.is_empty() {
        return Err(TimelineError::validation("transition kind must be non-empty"));
    }

    match kind.as_str() {
        "fade" | "crossfade" => Ok(TransitionKind::Fade),
        "slide" => Ok(TransitionKind::Slide),
        "dissolve" => Ok(TransitionKind::Dissolve),
        "none" | "cut" => Ok(TransitionKind::None),
        _ => Err(TimelineError::validation(format!(
            "unknown transition kind '{kind}'"
        ))),
    }
}

impl FromStr for TransitionKind {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_transition(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
