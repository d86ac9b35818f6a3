use futures::future;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use tracing::{debug, trace};

use crate::animation::clock::Clock;
use crate::animation::ease::Ease;
use crate::assets::cache::{ImageCache, ImageHandle};
use crate::config::TransitionConfig;
use crate::effects::composite::{dissolve_in_place, fade_in_place, slide_in_place};
use crate::effects::transitions::TransitionKind;
use crate::foundation::error::{TimelineError, TimelineResult};
use crate::model::sequence::FrameSequence;
use crate::render::renderer::{Interpolation, Renderer};
use crate::render::surface::Surface;

/// Shared collaborators a transition draws with.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub frames: &'a FrameSequence,
    pub renderer: &'a Renderer,
    pub cache: &'a ImageCache,
    /// Active index name.
    pub index: &'a str,
}

impl<'a> RenderContext<'a> {
    /// Resolve the imagery of frame `pos` through the cache.
    pub async fn image(&self, pos: usize) -> Option<ImageHandle> {
        let url = self.frames.get(pos)?.image_url(self.index);
        self.cache.get_opt(url).await
    }

    /// Direct render of frame `pos` with overlay.
    pub fn draw_direct<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        pos: usize,
        image: Option<&ImageHandle>,
    ) -> TimelineResult<()> {
        let frame = self
            .frames
            .get(pos)
            .ok_or_else(|| TimelineError::validation(format!("no frame at position {pos}")))?;
        self.renderer
            .draw_direct(surface, frame, self.index, image.map(|h| h.as_ref()))
    }
}

/// Observable transition state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionState {
    Idle,
    Active {
        from: usize,
        to: usize,
        /// Linear time progress in `[0, 1]` (easing is applied only when drawing).
        progress: f64,
        start_ms: f64,
        kind: TransitionKind,
        duration_ms: u32,
    },
}

/// Result of [`TransitionEngine::request`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// `to` was drawn directly; commit it now.
    Rendered { to: usize },
    /// An animation is running; drive it with [`TransitionEngine::step`].
    Started { from: usize, to: usize },
}

/// Result of [`TransitionEngine::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    Idle,
    Progress { progress: f64 },
    /// The target was drawn with its full overlay; commit it now.
    Completed { to: usize },
}

enum Strategy {
    /// Both sides have imagery: blend pre-rendered full layers.
    Layers {
        from: Vec<u8>,
        to: Vec<u8>,
        scratch: Vec<u8>,
    },
    /// Neither side has imagery: re-draw the placeholder with interpolated color and value.
    PlaceholderMorph,
}

struct Active {
    from: usize,
    to: usize,
    kind: TransitionKind,
    easing: Ease,
    duration_ms: u32,
    start_ms: f64,
    progress: f64,
    to_image: Option<ImageHandle>,
    strategy: Strategy,
}

/// `Idle -> Active(from, to, progress) -> Idle` animator for frame hand-offs.
pub struct TransitionEngine {
    config: TransitionConfig,
    rng: Pcg64Mcg,
    active: Option<Active>,
}

impl std::fmt::Debug for TransitionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionEngine")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

impl TransitionEngine {
    pub fn new(config: TransitionConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            config,
            rng: Pcg64Mcg::seed_from_u64(seed),
            active: None,
        }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    pub fn set_kind(&mut self, kind: TransitionKind) {
        self.config.kind = kind;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn state(&self) -> TransitionState {
        match &self.active {
            None => TransitionState::Idle,
            Some(a) => TransitionState::Active {
                from: a.from,
                to: a.to,
                progress: a.progress,
                start_ms: a.start_ms,
                kind: a.kind,
                duration_ms: a.duration_ms,
            },
        }
    }

    /// Stop the running animation. No further steps draw anything.
    ///
    /// Returns the target of the cancelled transition.
    pub fn cancel(&mut self) -> Option<usize> {
        let active = self.active.take()?;
        debug!(from = active.from, to = active.to, progress = active.progress, "transition cancelled");
        Some(active.to)
    }

    /// Begin a hand-off from `from` to `to`.
    ///
    /// A running transition is cancelled first. Cuts, disabled transitions and pairs where exactly
    /// one side lacks imagery draw `to` directly. Otherwise both images are awaited together, the
    /// animation starts at the clock time after loading, and progress 0 is drawn immediately.
    pub async fn request<S: Surface + ?Sized>(
        &mut self,
        from: usize,
        to: usize,
        clock: &dyn Clock,
        surface: &mut S,
        ctx: RenderContext<'_>,
    ) -> TimelineResult<TransitionOutcome> {
        if let Some(superseded) = self.cancel() {
            debug!(superseded, "transition superseded");
        }
        let len = ctx.frames.len();
        if from >= len || to >= len {
            return Err(TimelineError::validation(format!(
                "transition {from} -> {to} out of range for {len} frames"
            )));
        }

        if !self.config.animates() || from == to {
            let image = ctx.image(to).await;
            ctx.draw_direct(surface, to, image.as_ref())?;
            return Ok(TransitionOutcome::Rendered { to });
        }

        let (from_image, to_image) = future::join(ctx.image(from), ctx.image(to)).await;
        let strategy = match (&from_image, &to_image) {
            (Some(a), Some(b)) => {
                ctx.draw_direct(surface, from, Some(a))?;
                let from_layer = surface.read_pixels();
                ctx.draw_direct(surface, to, Some(b))?;
                let to_layer = surface.read_pixels();
                Strategy::Layers {
                    scratch: vec![0; from_layer.len()],
                    from: from_layer,
                    to: to_layer,
                }
            }
            (None, None) => Strategy::PlaceholderMorph,
            _ => {
                debug!(from, to, "imagery on one side only, cutting");
                ctx.draw_direct(surface, to, to_image.as_ref())?;
                return Ok(TransitionOutcome::Rendered { to });
            }
        };

        let start_ms = clock.now_ms();
        self.active = Some(Active {
            from,
            to,
            kind: self.config.kind,
            easing: self.config.easing,
            duration_ms: self.config.duration_ms,
            start_ms,
            progress: 0.0,
            to_image,
            strategy,
        });
        debug!(from, to, kind = ?self.config.kind, duration_ms = self.config.duration_ms, "transition started");
        self.draw_progress(surface, &ctx)?;
        Ok(TransitionOutcome::Started { from, to })
    }

    /// Advance the running animation to `now_ms` and draw it.
    ///
    /// Progress never decreases. When it reaches 1 the target is drawn directly with its overlay
    /// and the engine returns to idle.
    pub fn step<S: Surface + ?Sized>(
        &mut self,
        now_ms: f64,
        surface: &mut S,
        ctx: RenderContext<'_>,
    ) -> TimelineResult<StepOutcome> {
        let Some(active) = self.active.as_mut() else {
            return Ok(StepOutcome::Idle);
        };
        let elapsed = (now_ms - active.start_ms).max(0.0);
        let raw = (elapsed / f64::from(active.duration_ms)).min(1.0);
        active.progress = active.progress.max(raw);

        if active.progress >= 1.0 {
            let Some(done) = self.active.take() else {
                return Ok(StepOutcome::Idle);
            };
            ctx.draw_direct(surface, done.to, done.to_image.as_ref())?;
            debug!(from = done.from, to = done.to, "transition completed");
            return Ok(StepOutcome::Completed { to: done.to });
        }

        let progress = active.progress;
        self.draw_progress(surface, &ctx)?;
        Ok(StepOutcome::Progress { progress })
    }

    fn draw_progress<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        ctx: &RenderContext<'_>,
    ) -> TimelineResult<()> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };
        let eased = active.easing.apply(active.progress);
        trace!(progress = active.progress, eased, "transition frame");

        match &mut active.strategy {
            Strategy::Layers { from, to, scratch } => {
                let t = eased as f32;
                match active.kind {
                    TransitionKind::Slide => {
                        slide_in_place(scratch, from, to, surface.width(), surface.height(), t)?
                    }
                    TransitionKind::Dissolve => {
                        dissolve_in_place(scratch, from, to, t, &mut self.rng)?;
                    }
                    TransitionKind::Fade | TransitionKind::None => {
                        fade_in_place(scratch, from, to, t)?
                    }
                }
                surface.write_pixels(scratch)
            }
            Strategy::PlaceholderMorph => {
                let (Some(from), Some(to)) = (ctx.frames.get(active.from), ctx.frames.get(active.to))
                else {
                    return Err(TimelineError::validation("transition frames no longer exist"));
                };
                ctx.renderer.draw(
                    surface,
                    to,
                    ctx.index,
                    None,
                    Some(Interpolation {
                        from,
                        progress: eased,
                    }),
                    false,
                )
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/transition.rs"]
mod tests;
