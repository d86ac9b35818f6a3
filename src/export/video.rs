use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, instrument};

use crate::assets::cache::ImageCache;
use crate::config::{ExportConfig, ExportLayout};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{TimelineError, TimelineResult};
use crate::model::sequence::FrameSequence;
use crate::render::pixmap::PixmapSurface;
use crate::render::renderer::Renderer;
use crate::render::report::{ReportContext, draw_report};

/// Shared flag that stops a running export before its next capture.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Summary of a finished export.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportReport {
    /// Samples handed to the sink; always the frame count.
    pub frames_captured: usize,
    /// Frames drawn without imagery (no URL or a failed load).
    pub placeholders: usize,
    /// `frames_captured / capture_rate`.
    pub duration_secs: f64,
}

/// Offline capture of a whole sequence, one sample per frame, into a [`FrameSink`].
#[derive(Clone, Debug)]
pub struct VideoExporter {
    config: ExportConfig,
    renderer: Renderer,
}

impl VideoExporter {
    pub fn new(config: ExportConfig, renderer: Renderer) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render every frame of `frames` for `index`, in order, at the configured size and rate.
    ///
    /// Image failures degrade the affected sample to the placeholder render. Cancellation is
    /// checked before each capture and surfaces as an export error; the sink is not finalized then.
    #[instrument(skip_all, fields(index = %index, frames = frames.len()))]
    pub async fn export(
        &self,
        frames: &FrameSequence,
        cache: &ImageCache,
        index: &str,
        parcel_name: &str,
        sink: &mut dyn FrameSink,
        cancel: &CancelToken,
    ) -> TimelineResult<ExportReport> {
        if frames.is_empty() {
            return Err(TimelineError::export("nothing to export: the sequence is empty"));
        }
        let fps = self.config.fps()?;
        let cfg = SinkConfig {
            width: self.config.width,
            height: self.config.height,
            fps,
        };
        let mut surface = PixmapSurface::new(cfg.width, cfg.height)?;
        let ctx = ReportContext {
            parcel_name: parcel_name.to_string(),
            footer: Some(generated_footer(chrono::Local::now().date_naive())),
        };

        sink.begin(cfg)?;
        let mut placeholders = 0;
        for (i, frame) in frames.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(TimelineError::export(format!(
                    "export cancelled after {i} of {} frames",
                    frames.len()
                )));
            }
            let image = cache.get_opt(frame.image_url(index)).await;
            if image.is_none() {
                placeholders += 1;
            }
            let image = image.as_deref();
            match self.config.layout {
                ExportLayout::Report => draw_report(&mut surface, frame, index, image, &ctx)?,
                ExportLayout::Player => {
                    self.renderer.draw_direct(&mut surface, frame, index, image)?
                }
            }
            sink.push_frame(FrameIndex(i as u64), &surface.to_frame())?;
            debug!(frame = i, at_secs = cfg.timestamp_secs(FrameIndex(i as u64)), "sample captured");
        }
        sink.end()?;

        let report = ExportReport {
            frames_captured: frames.len(),
            placeholders,
            duration_secs: fps.frames_to_secs(frames.len() as u64),
        };
        info!(
            frames = report.frames_captured,
            placeholders = report.placeholders,
            duration_secs = report.duration_secs,
            "export finished"
        );
        Ok(report)
    }
}

/// `Generated: 2024-05-01`
pub fn generated_footer(date: chrono::NaiveDate) -> String {
    format!("Generated: {}", date.format("%Y-%m-%d"))
}

#[cfg(test)]
#[path = "../../tests/unit/export/video.rs"]
mod tests;
