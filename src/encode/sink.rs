use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{TimelineError, TimelineResult};
use crate::render::frame::FrameRGBA;

/// Stream parameters announced to a [`FrameSink`] before the first sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Capture rate.
    pub fps: Fps,
}

impl SinkConfig {
    /// Presentation time of sample `idx`.
    pub fn timestamp_secs(&self, idx: FrameIndex) -> f64 {
        self.fps.frames_to_secs(idx.0)
    }
}

/// Consumer of captured samples.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> TimelineResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TimelineResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> TimelineResult<()>;
}

/// In-memory sink for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Stream duration: sample count divided by the capture rate.
    pub fn duration_secs(&self) -> f64 {
        self.cfg
            .map(|c| c.fps.frames_to_secs(self.frames.len() as u64))
            .unwrap_or(0.0)
    }

    /// Presentation timestamps of the captured samples.
    pub fn timestamps(&self) -> Vec<f64> {
        match self.cfg {
            Some(cfg) => self
                .frames
                .iter()
                .map(|(idx, _)| cfg.timestamp_secs(*idx))
                .collect(),
            None => Vec::new(),
        }
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TimelineResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TimelineResult<()> {
        if self.cfg.is_none() {
            return Err(TimelineError::export("in-memory sink not started"));
        }
        if let Some((last, _)) = self.frames.last()
            && idx.0 <= last.0
        {
            return Err(TimelineError::export("sink received out-of-order frame index"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> TimelineResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
