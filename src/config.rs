use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::animation::ease::Ease;
use crate::effects::transitions::TransitionKind;
use crate::foundation::core::Fps;
use crate::foundation::error::{TimelineError, TimelineResult};

/// Longest accepted transition.
pub const MAX_TRANSITION_MS: u32 = 10_000;

/// Injected configuration of a [`crate::TimelinePlayer`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub transitions: TransitionConfig,
    pub playback: PlaybackConfig,
    pub render: RenderConfig,
    pub export: ExportConfig,
}

impl PlayerConfig {
    pub fn from_json_str(s: &str) -> TimelineResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| TimelineError::validation(format!("invalid player config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> TimelineResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open player config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse player config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> TimelineResult<()> {
        self.transitions.validate()?;
        self.playback.validate()?;
        self.render.validate()?;
        self.export.validate()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// When `false` every request renders the target directly.
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: TransitionKind,
    pub duration_ms: u32,
    pub easing: Ease,
    /// Fixed dissolve seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: TransitionKind::Fade,
            duration_ms: 1200,
            easing: Ease::Cubic,
            seed: None,
        }
    }
}

impl TransitionConfig {
    /// `true` when a request should animate rather than cut.
    pub fn animates(&self) -> bool {
        self.enabled && !self.kind.is_cut()
    }

    fn validate(&self) -> TimelineResult<()> {
        if self.duration_ms == 0 || self.duration_ms > MAX_TRANSITION_MS {
            return Err(TimelineError::validation(format!(
                "transitions.duration_ms must be in 1..={MAX_TRANSITION_MS}, got {}",
                self.duration_ms
            )));
        }
        Ok(())
    }
}

/// Playback speed presets, each mapped to an explicit frame interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlaybackSpeed {
    #[serde(rename = "0.5x")]
    Half,
    #[default]
    #[serde(rename = "1x")]
    Normal,
    #[serde(rename = "2x")]
    Double,
    #[serde(rename = "4x")]
    Quadruple,
}

impl PlaybackSpeed {
    pub const ALL: [PlaybackSpeed; 4] = [
        PlaybackSpeed::Half,
        PlaybackSpeed::Normal,
        PlaybackSpeed::Double,
        PlaybackSpeed::Quadruple,
    ];

    /// Milliseconds between auto-advance ticks.
    pub fn interval_ms(self) -> u64 {
        match self {
            Self::Half => 16_000,
            Self::Normal => 8_000,
            Self::Double => 4_000,
            Self::Quadruple => 2_000,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Half => 0.5,
            Self::Normal => 1.0,
            Self::Double => 2.0,
            Self::Quadruple => 4.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Half => "0.5x",
            Self::Normal => "1x",
            Self::Double => "2x",
            Self::Quadruple => "4x",
        }
    }

    /// Step `delta` presets through [`PlaybackSpeed::ALL`], wrapping at both ends.
    pub fn cycle(self, delta: i32) -> Self {
        let n = Self::ALL.len() as i32;
        let pos = Self::ALL.iter().position(|s| *s == self).unwrap_or(1) as i32;
        Self::ALL[(pos + delta).rem_euclid(n) as usize]
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub speed: PlaybackSpeed,
    /// Index shown at startup.
    pub index: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: PlaybackSpeed::Normal,
            index: "ndvi".to_string(),
        }
    }
}

impl PlaybackConfig {
    fn validate(&self) -> TimelineResult<()> {
        if self.index.trim().is_empty() {
            return Err(TimelineError::validation("playback.index must be non-empty"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Surface width at which overlay geometry is drawn at nominal size.
    pub reference_width: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            reference_width: 1000.0,
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> TimelineResult<()> {
        if !self.reference_width.is_finite() || self.reference_width <= 0.0 {
            return Err(TimelineError::validation(
                "render.reference_width must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Composition used for exported samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportLayout {
    /// Header, main visual and data panel.
    #[default]
    Report,
    /// Same composition as the live player.
    Player,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub width: u32,
    pub height: u32,
    /// Captured samples per second.
    pub capture_rate: u32,
    pub layout: ExportLayout,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            capture_rate: 2,
            layout: ExportLayout::Report,
        }
    }
}

impl ExportConfig {
    pub fn fps(&self) -> TimelineResult<Fps> {
        Fps::new(self.capture_rate, 1)
    }

    fn validate(&self) -> TimelineResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TimelineError::validation(
                "export width/height must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(TimelineError::validation(
                "export width/height must be even (yuv420p)",
            ));
        }
        if self.capture_rate == 0 {
            return Err(TimelineError::validation("export.capture_rate must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
