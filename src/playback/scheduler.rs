use tracing::{debug, warn};

use crate::config::PlaybackSpeed;

/// Observable playback state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Committed frame position; `0 <= current < len` whenever the sequence is non-empty.
    pub current: usize,
    pub speed: PlaybackSpeed,
    pub frame_interval_ms: u64,
}

impl PlaybackState {
    pub fn speed_multiplier(&self) -> f64 {
        self.speed.multiplier()
    }
}

/// The single scheduled auto-advance tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingTick {
    /// Clock time (ms) at which the tick fires.
    pub due_ms: f64,
}

/// Timer-driven play/pause/speed control and navigation arithmetic over a sequence of `len`
/// frames.
///
/// The scheduler never sleeps: the host reports time through [`PlaybackScheduler::poll`]. Holding
/// the tick in an `Option` means there is never more than one pending.
#[derive(Clone, Debug)]
pub struct PlaybackScheduler {
    len: usize,
    current: usize,
    speed: PlaybackSpeed,
    pending: Option<PendingTick>,
}

impl PlaybackScheduler {
    pub fn new(len: usize, speed: PlaybackSpeed) -> Self {
        Self {
            len,
            current: 0,
            speed,
            pending: None,
        }
    }

    /// Stop and rewind for a sequence of `len` frames.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.current = 0;
        self.pending = None;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    pub fn is_playing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            is_playing: self.is_playing(),
            current: self.current,
            speed: self.speed,
            frame_interval_ms: self.speed.interval_ms(),
        }
    }

    /// Number of scheduled ticks, always 0 or 1.
    pub fn pending_ticks(&self) -> usize {
        usize::from(self.pending.is_some())
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.pending.map(|t| t.due_ms)
    }

    fn interval(&self) -> f64 {
        self.speed.interval_ms() as f64
    }

    /// Stopped -> Playing. Returns `false` when already playing or there is nothing to play.
    pub fn play(&mut self, now_ms: f64) -> bool {
        if self.is_playing() || self.len == 0 {
            return false;
        }
        self.pending = Some(PendingTick {
            due_ms: now_ms + self.interval(),
        });
        debug!(current = self.current, interval_ms = self.speed.interval_ms(), "playback started");
        true
    }

    /// Playing -> Stopped, dropping the pending tick.
    pub fn pause(&mut self) -> bool {
        if self.pending.take().is_none() {
            return false;
        }
        debug!(current = self.current, "playback paused");
        true
    }

    /// Returns the new playing flag.
    pub fn toggle(&mut self, now_ms: f64) -> bool {
        if self.is_playing() {
            self.pause();
        } else {
            self.play(now_ms);
        }
        self.is_playing()
    }

    /// Change speed; a pending tick is replaced by one a full new interval from `now_ms`.
    pub fn set_speed(&mut self, speed: PlaybackSpeed, now_ms: f64) {
        self.speed = speed;
        if let Some(tick) = self.pending.as_mut() {
            tick.due_ms = now_ms + speed.interval_ms() as f64;
        }
        debug!(speed = speed.label(), playing = self.is_playing(), "playback speed changed");
    }

    pub fn cycle_speed(&mut self, delta: i32, now_ms: f64) -> PlaybackSpeed {
        let next = self.speed.cycle(delta);
        self.set_speed(next, now_ms);
        next
    }

    /// Fire the pending tick if it is due, returning the auto-advance target `(current + 1) % len`.
    ///
    /// The next tick is scheduled one interval after the fired one; a host that fell behind by more
    /// than an interval resumes from `now_ms` instead of bursting.
    pub fn poll(&mut self, now_ms: f64) -> Option<usize> {
        let tick = self.pending?;
        if now_ms < tick.due_ms || self.len == 0 {
            return None;
        }
        let mut due = tick.due_ms + self.interval();
        if due <= now_ms {
            due = now_ms + self.interval();
        }
        self.pending = Some(PendingTick { due_ms: due });
        Some((self.current + 1) % self.len)
    }

    /// Make `index` the current frame. Out-of-range positions are rejected.
    pub fn commit(&mut self, index: usize) -> bool {
        if index >= self.len {
            warn!(index, len = self.len, "refusing to commit out-of-range frame");
            return false;
        }
        self.current = index;
        true
    }

    /// Target of `next`, clamped at the last frame.
    pub fn resolve_next(&self) -> Option<usize> {
        (self.len > 0).then(|| (self.current + 1).min(self.len - 1))
    }

    /// Target of `prev`, clamped at the first frame.
    pub fn resolve_prev(&self) -> Option<usize> {
        (self.len > 0).then(|| self.current.saturating_sub(1))
    }

    pub fn resolve_go_to(&self, index: usize) -> Option<usize> {
        if index < self.len {
            Some(index)
        } else {
            warn!(index, len = self.len, "navigation target out of range");
            None
        }
    }

    pub fn resolve_first(&self) -> Option<usize> {
        (self.len > 0).then_some(0)
    }

    pub fn resolve_last(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
