use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, info, instrument, warn};

use crate::animation::clock::Clock;
use crate::assets::cache::ImageCache;
use crate::config::{PlaybackSpeed, PlayerConfig};
use crate::encode::sink::FrameSink;
use crate::effects::transitions::TransitionKind;
use crate::export::video::{CancelToken, ExportReport, VideoExporter};
use crate::foundation::error::{TimelineError, TimelineResult};
use crate::model::feed::Feed;
use crate::model::panel::{MetadataPanel, frame_counter};
use crate::model::sequence::FrameSequence;
use crate::playback::scheduler::{PlaybackScheduler, PlaybackState};
use crate::playback::transition::{
    RenderContext, StepOutcome, TransitionEngine, TransitionOutcome, TransitionState,
};
use crate::render::renderer::Renderer;
use crate::render::surface::Surface;

const NO_FRAMES_MESSAGE: &str = "No historical frames available for this parcel";

/// Whether the player has something to play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedStatus {
    /// No feed loaded yet, or the feed had no frames.
    Empty,
    Ready,
    /// The last feed load failed; playback stays blocked until a load succeeds.
    Failed(String),
}

/// Dismissible message surfaced to the user, e.g. after a failed export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

/// What one [`TimelinePlayer::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    Idle,
    /// A transition frame was drawn.
    Progress(f64),
    /// Auto-advance started an animated hand-off.
    Started { from: usize, to: usize },
    /// `to` is now the committed frame.
    Committed(usize),
}

/// Explicitly constructed player tying the scheduler, transitions, cache and renderer to one surface.
pub struct TimelinePlayer<S: Surface> {
    config: PlayerConfig,
    frames: FrameSequence,
    parcel_name: String,
    cache: ImageCache,
    renderer: Renderer,
    scheduler: PlaybackScheduler,
    transitions: TransitionEngine,
    clock: Arc<dyn Clock>,
    surface: S,
    index: String,
    status: FeedStatus,
    notice: Option<Notice>,
}

impl<S: Surface> std::fmt::Debug for TimelinePlayer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelinePlayer")
            .field("frames", &self.frames.len())
            .field("index", &self.index)
            .field("status", &self.status)
            .field("playback", &self.scheduler.state())
            .field("transition", &self.transitions.state())
            .finish()
    }
}

impl<S: Surface> TimelinePlayer<S> {
    pub fn new(
        config: PlayerConfig,
        cache: ImageCache,
        clock: Arc<dyn Clock>,
        surface: S,
    ) -> TimelineResult<Self> {
        config.validate()?;
        Ok(Self {
            frames: FrameSequence::default(),
            parcel_name: String::new(),
            cache,
            renderer: Renderer::new(&config.render),
            scheduler: PlaybackScheduler::new(0, config.playback.speed),
            transitions: TransitionEngine::new(config.transitions.clone()),
            clock,
            surface,
            index: config.playback.index.clone(),
            status: FeedStatus::Empty,
            notice: None,
            config,
        })
    }

    /// Split borrows: read-only render collaborators, the transition engine and the surface.
    fn parts(&mut self) -> (RenderContext<'_>, &mut TransitionEngine, &mut S) {
        (
            RenderContext {
                frames: &self.frames,
                renderer: &self.renderer,
                cache: &self.cache,
                index: &self.index,
            },
            &mut self.transitions,
            &mut self.surface,
        )
    }

    fn is_ready(&self) -> bool {
        self.status == FeedStatus::Ready
    }

    /// Install the result of a feed fetch.
    ///
    /// A failure blocks playback, draws the error card and is returned to the caller.
    #[instrument(skip_all)]
    pub async fn load_feed(&mut self, feed: TimelineResult<Feed>) -> TimelineResult<()> {
        match feed {
            Ok(feed) => {
                self.load_sequence(feed.sequence, feed.parcel_name.unwrap_or_default())
                    .await
            }
            Err(err) => {
                warn!(error = %err, "feed load failed");
                self.transitions.cancel();
                self.scheduler.reset(0);
                self.frames = FrameSequence::default();
                self.status = FeedStatus::Failed(err.to_string());
                self.renderer.draw_error(&mut self.surface, &err.to_string())?;
                Err(err)
            }
        }
    }

    /// Parse a raw feed body and install it.
    pub async fn load_feed_bytes(&mut self, body: &[u8]) -> TimelineResult<()> {
        self.load_feed(crate::model::feed::parse_feed(body)).await
    }

    /// Replace the sequence, stop playback and show the first frame.
    pub async fn load_sequence(
        &mut self,
        frames: FrameSequence,
        parcel_name: impl Into<String>,
    ) -> TimelineResult<()> {
        self.transitions.cancel();
        self.scheduler.reset(frames.len());
        self.frames = frames;
        self.parcel_name = parcel_name.into();
        self.notice = None;
        if self.frames.is_empty() {
            self.status = FeedStatus::Empty;
            return self.renderer.draw_error(&mut self.surface, NO_FRAMES_MESSAGE);
        }
        self.status = FeedStatus::Ready;
        info!(frames = self.frames.len(), parcel = %self.parcel_name, "sequence loaded");
        self.render_current().await
    }

    async fn render_current(&mut self) -> TimelineResult<()> {
        let pos = self.scheduler.current();
        let (ctx, _, surface) = self.parts();
        let image = ctx.image(pos).await;
        ctx.draw_direct(surface, pos, image.as_ref())
    }

    /// Cancel a running transition and commit its target without drawing.
    fn settle(&mut self) -> bool {
        match self.transitions.cancel() {
            Some(to) => self.scheduler.commit(to),
            None => false,
        }
    }

    async fn transition_to(&mut self, target: usize) -> TimelineResult<TransitionOutcome> {
        let from = self.scheduler.current();
        let clock = Arc::clone(&self.clock);
        let (ctx, transitions, surface) = self.parts();
        let outcome = transitions
            .request(from, target, clock.as_ref(), surface, ctx)
            .await?;
        if let TransitionOutcome::Rendered { to } = outcome {
            self.scheduler.commit(to);
        }
        Ok(outcome)
    }

    async fn navigate(
        &mut self,
        resolve: impl FnOnce(&PlaybackScheduler) -> Option<usize>,
    ) -> TimelineResult<bool> {
        if !self.is_ready() {
            warn!(status = ?self.status, "navigation ignored: no frames loaded");
            return Ok(false);
        }
        let was_active = self.settle();
        let Some(target) = resolve(&self.scheduler) else {
            if was_active {
                self.render_current().await?;
            }
            return Ok(false);
        };
        if target == self.scheduler.current() && !was_active {
            return Ok(true);
        }
        debug!(from = self.scheduler.current(), to = target, "navigate");
        self.transition_to(target).await?;
        Ok(true)
    }

    /// Jump to `index`. Out-of-range targets are refused with `Ok(false)`.
    pub async fn go_to(&mut self, index: usize) -> TimelineResult<bool> {
        self.navigate(|s| s.resolve_go_to(index)).await
    }

    /// Step forward, clamped at the last frame.
    pub async fn next(&mut self) -> TimelineResult<bool> {
        self.navigate(PlaybackScheduler::resolve_next).await
    }

    /// Step back, clamped at the first frame.
    pub async fn prev(&mut self) -> TimelineResult<bool> {
        self.navigate(PlaybackScheduler::resolve_prev).await
    }

    pub async fn first(&mut self) -> TimelineResult<bool> {
        self.navigate(PlaybackScheduler::resolve_first).await
    }

    pub async fn last(&mut self) -> TimelineResult<bool> {
        self.navigate(PlaybackScheduler::resolve_last).await
    }

    pub fn play(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.scheduler.play(self.clock.now_ms())
    }

    pub fn pause(&mut self) -> bool {
        self.scheduler.pause()
    }

    /// Returns the new playing flag.
    pub fn toggle(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.scheduler.toggle(self.clock.now_ms())
    }

    /// Change speed. A running transition is settled and its target drawn first.
    pub async fn set_speed(&mut self, speed: PlaybackSpeed) -> TimelineResult<()> {
        if self.settle() {
            self.render_current().await?;
        }
        self.scheduler.set_speed(speed, self.clock.now_ms());
        Ok(())
    }

    pub async fn cycle_speed(&mut self, delta: i32) -> TimelineResult<PlaybackSpeed> {
        let next = self.scheduler.speed().cycle(delta);
        self.set_speed(next).await?;
        Ok(next)
    }

    /// Switch the active index and redraw the committed frame for it.
    pub async fn set_index(&mut self, index: impl Into<String>) -> TimelineResult<()> {
        let index = index.into();
        if index.trim().is_empty() {
            return Err(TimelineError::validation("index name must be non-empty"));
        }
        self.settle();
        debug!(from = %self.index, to = %index, "active index changed");
        self.index = index;
        if self.is_ready() {
            self.render_current().await?;
        }
        Ok(())
    }

    /// Drive transitions and auto-advance from the clock. Call on every host frame.
    pub async fn tick(&mut self) -> TimelineResult<Tick> {
        if !self.is_ready() {
            return Ok(Tick::Idle);
        }
        let now = self.clock.now_ms();

        let mut outcome = Tick::Idle;
        if self.transitions.is_active() {
            let (ctx, transitions, surface) = self.parts();
            match transitions.step(now, surface, ctx)? {
                StepOutcome::Completed { to } => {
                    self.scheduler.commit(to);
                    outcome = Tick::Committed(to);
                }
                StepOutcome::Progress { progress } => outcome = Tick::Progress(progress),
                StepOutcome::Idle => {}
            }
        }

        if self.scheduler.next_deadline().is_some_and(|due| now >= due) {
            self.settle();
            if let Some(target) = self.scheduler.poll(now) {
                outcome = match self.transition_to(target).await? {
                    TransitionOutcome::Rendered { to } => Tick::Committed(to),
                    TransitionOutcome::Started { from, to } => Tick::Started { from, to },
                };
            }
        }
        Ok(outcome)
    }

    /// Earliest clock time at which [`TimelinePlayer::tick`] has scheduled work.
    pub fn next_deadline(&self) -> Option<f64> {
        if self.transitions.is_active() {
            return Some(self.clock.now_ms());
        }
        self.scheduler.next_deadline()
    }

    /// Warm the cache for the committed frame and its neighbours.
    pub fn preload_around(&self) -> BoxFuture<'static, usize> {
        let current = self.scheduler.current();
        let range = current.saturating_sub(1)..current + 2;
        self.cache.preload(self.frames.image_urls(&self.index, range))
    }

    /// Export the whole sequence for `index` (the active one when `None`).
    ///
    /// Playback is paused for the duration. The active index and run state are restored whether
    /// the export succeeds or not; a failure is also kept as a dismissible [`Notice`].
    #[instrument(skip_all, fields(index = ?index))]
    pub async fn export_video(
        &mut self,
        index: Option<&str>,
        sink: &mut dyn FrameSink,
        cancel: &CancelToken,
    ) -> TimelineResult<ExportReport> {
        let was_playing = self.scheduler.pause();
        let original = self.index.clone();
        let result = self.run_export(index, sink, cancel).await;

        self.index = original;
        if was_playing {
            self.scheduler.play(self.clock.now_ms());
        }
        if let Err(err) = &result {
            warn!(error = %err, "export failed");
            self.notice = Some(Notice {
                message: err.to_string(),
            });
        }
        result
    }

    async fn run_export(
        &mut self,
        index: Option<&str>,
        sink: &mut dyn FrameSink,
        cancel: &CancelToken,
    ) -> TimelineResult<ExportReport> {
        if !self.is_ready() {
            return Err(TimelineError::export("no frames loaded"));
        }
        if self.settle() {
            self.render_current().await?;
        }
        if let Some(index) = index {
            self.index = index.to_string();
        }
        let exporter = VideoExporter::new(self.config.export.clone(), self.renderer.clone());
        exporter
            .export(&self.frames, &self.cache, &self.index, &self.parcel_name, sink, cancel)
            .await
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.scheduler.state()
    }

    pub fn transition_state(&self) -> TransitionState {
        self.transitions.state()
    }

    pub fn set_transitions_enabled(&mut self, enabled: bool) {
        self.transitions.set_enabled(enabled);
    }

    pub fn set_transition_kind(&mut self, kind: TransitionKind) {
        self.transitions.set_kind(kind);
    }

    /// Side-panel content for the committed frame.
    pub fn metadata_panel(&self) -> Option<MetadataPanel> {
        let pos = self.scheduler.current();
        let frame = self.frames.get(pos)?;
        Some(MetadataPanel::build(frame, &self.index, pos, self.frames.len()))
    }

    /// `i / N`, `None` without frames.
    pub fn frame_counter(&self) -> Option<String> {
        (!self.frames.is_empty())
            .then(|| frame_counter(self.scheduler.current(), self.frames.len()))
    }

    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn parcel_name(&self) -> &str {
        &self.parcel_name
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
#[path = "../tests/unit/player.rs"]
mod tests;
