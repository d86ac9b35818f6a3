use std::collections::HashMap;

use futures::executor::block_on;
use futures::future::{BoxFuture, FutureExt};

use super::*;
use crate::animation::clock::ManualClock;
use crate::assets::cache::ImageLoader;
use crate::assets::image::PreparedImage;
use crate::foundation::core::Rgba8;
use crate::model::frame::{Classification, Frame, IndexMetric, Period};
use crate::render::pixmap::PixmapSurface;

const W: u32 = 64;
const H: u32 = 32;

struct MapLoader(HashMap<&'static str, [u8; 3]>);

impl ImageLoader for MapLoader {
    fn load(&self, url: &str) -> BoxFuture<'static, TimelineResult<PreparedImage>> {
        let out = match self.0.get(url) {
            Some(rgb) => Ok(PreparedImage::solid(16, 8, *rgb)),
            None => Err(TimelineError::image_load(format!("missing {url}"))),
        };
        future::ready(out).boxed()
    }
}

fn frame(month: u8, value: f64, color: Rgba8, url: Option<&str>) -> Frame {
    Frame::new(Period { year: 2024, month }, format!("M{month}"))
        .with_metric(
            "ndvi",
            IndexMetric {
                average: Some(value),
                classification: Some(Classification {
                    color,
                    icon: "🌿".to_string(),
                    label: format!("L{month}"),
                    description: String::new(),
                }),
                ..IndexMetric::default()
            },
        )
        .with_image("ndvi", url.map(str::to_owned))
}

struct Fixture {
    frames: FrameSequence,
    renderer: Renderer,
    cache: ImageCache,
    clock: ManualClock,
}

impl Fixture {
    fn new() -> Self {
        let frames = FrameSequence::new(vec![
            frame(1, 0.2, Rgba8::rgb(200, 0, 0), Some("/a.png")),
            frame(2, 0.5, Rgba8::rgb(0, 200, 0), Some("/b.png")),
            frame(3, 0.3, Rgba8::rgb(0, 0, 200), None),
            frame(4, 0.8, Rgba8::rgb(200, 200, 0), None),
            frame(5, 0.1, Rgba8::rgb(0, 0, 0), Some("/broken.png")),
        ])
        .unwrap();
        let loader = MapLoader(HashMap::from([
            ("/a.png", [255, 0, 0]),
            ("/b.png", [0, 0, 255]),
        ]));
        Self {
            frames,
            renderer: Renderer::default(),
            cache: ImageCache::new(loader),
            clock: ManualClock::new(1_000.0),
        }
    }

    fn ctx(&self) -> RenderContext<'_> {
        RenderContext {
            frames: &self.frames,
            renderer: &self.renderer,
            cache: &self.cache,
            index: "ndvi",
        }
    }

    fn direct(&self, pos: usize) -> Vec<u8> {
        let mut s = PixmapSurface::new(W, H).unwrap();
        let ctx = self.ctx();
        let image = block_on(ctx.image(pos));
        ctx.draw_direct(&mut s, pos, image.as_ref()).unwrap();
        s.read_pixels()
    }
}

fn engine(kind: TransitionKind) -> TransitionEngine {
    TransitionEngine::new(TransitionConfig {
        kind,
        duration_ms: 600,
        seed: Some(7),
        ..TransitionConfig::default()
    })
}

#[test]
fn fade_endpoints_match_direct_renders() {
    let fx = Fixture::new();
    let mut e = engine(TransitionKind::Fade);
    let mut s = PixmapSurface::new(W, H).unwrap();

    let out = block_on(e.request(0, 1, &fx.clock, &mut s, fx.ctx())).unwrap();
    assert_eq!(out, TransitionOutcome::Started { from: 0, to: 1 });
    assert_eq!(s.read_pixels(), fx.direct(0));

    let mid = e.step(1_300.0, &mut s, fx.ctx()).unwrap();
    assert_eq!(mid, StepOutcome::Progress { progress: 0.5 });
    assert_ne!(s.read_pixels(), fx.direct(0));
    assert_ne!(s.read_pixels(), fx.direct(1));

    let done = e.step(1_600.0, &mut s, fx.ctx()).unwrap();
    assert_eq!(done, StepOutcome::Completed { to: 1 });
    assert_eq!(s.read_pixels(), fx.direct(1));
    assert!(!e.is_active());
    assert_eq!(e.step(2_000.0, &mut s, fx.ctx()).unwrap(), StepOutcome::Idle);
}

#[test]
fn progress_never_decreases() {
    let fx = Fixture::new();
    let mut e = engine(TransitionKind::Slide);
    let mut s = PixmapSurface::new(W, H).unwrap();
    block_on(e.request(0, 1, &fx.clock, &mut s, fx.ctx())).unwrap();

    let mut last = 0.0;
    for now in [1_100.0, 1_050.0, 1_400.0, 1_200.0, 1_599.0] {
        match e.step(now, &mut s, fx.ctx()).unwrap() {
            StepOutcome::Progress { progress } => {
                assert!(progress >= last);
                last = progress;
            }
            other => panic!("unexpected {other:?}"),
        }
    }
    match e.state() {
        TransitionState::Active { progress, .. } => assert!(progress < 1.0),
        TransitionState::Idle => panic!("should still be active"),
    }
    assert_eq!(
        e.step(5_000.0, &mut s, fx.ctx()).unwrap(),
        StepOutcome::Completed { to: 1 }
    );
}

#[test]
fn disabled_or_cut_renders_directly() {
    let fx = Fixture::new();
    let mut s = PixmapSurface::new(W, H).unwrap();

    let mut e = engine(TransitionKind::None);
    let out = block_on(e.request(0, 1, &fx.clock, &mut s, fx.ctx())).unwrap();
    assert_eq!(out, TransitionOutcome::Rendered { to: 1 });
    assert!(!e.is_active());
    assert_eq!(s.read_pixels(), fx.direct(1));

    let mut e = engine(TransitionKind::Fade);
    e.set_enabled(false);
    let out = block_on(e.request(1, 0, &fx.clock, &mut s, fx.ctx())).unwrap();
    assert_eq!(out, TransitionOutcome::Rendered { to: 0 });
}

#[test]
fn one_sided_imagery_cuts_to_target() {
    let fx = Fixture::new();
    let mut e = engine(TransitionKind::Fade);
    let mut s = PixmapSurface::new(W, H).unwrap();

    let out = block_on(e.request(1, 2, &fx.clock, &mut s, fx.ctx())).unwrap();
    assert_eq!(out, TransitionOutcome::Rendered { to: 2 });
    assert_eq!(s.read_pixels(), fx.direct(2));

    // A failed load counts as missing imagery.
    let out = block_on(e.request(0, 4, &fx.clock, &mut s, fx.ctx())).unwrap();
    assert_eq!(out, TransitionOutcome::Rendered { to: 4 });
}

#[test]
fn placeholder_pair_morphs_and_finishes_with_overlay() {
    let fx = Fixture::new();
    let mut e = engine(TransitionKind::Fade);
    let mut s = PixmapSurface::new(W, H).unwrap();

    let out = block_on(e.request(2, 3, &fx.clock, &mut s, fx.ctx())).unwrap();
    assert_eq!(out, TransitionOutcome::Started { from: 2, to: 3 });
    e.step(1_300.0, &mut s, fx.ctx()).unwrap();
    assert_eq!(
        e.step(1_600.0, &mut s, fx.ctx()).unwrap(),
        StepOutcome::Completed { to: 3 }
    );
    assert_eq!(s.read_pixels(), fx.direct(3));
}

#[test]
fn new_request_cancels_the_running_one() {
    let fx = Fixture::new();
    let mut e = engine(TransitionKind::Fade);
    let mut s = PixmapSurface::new(W, H).unwrap();

    block_on(e.request(0, 1, &fx.clock, &mut s, fx.ctx())).unwrap();
    fx.clock.advance(200.0);
    block_on(e.request(2, 3, &fx.clock, &mut s, fx.ctx())).unwrap();
    match e.state() {
        TransitionState::Active {
            from, to, start_ms, ..
        } => {
            assert_eq!((from, to), (2, 3));
            assert_eq!(start_ms, 1_200.0);
        }
        TransitionState::Idle => panic!("expected active"),
    }
    assert_eq!(e.cancel(), Some(3));
    assert_eq!(e.cancel(), None);
    assert_eq!(e.step(9_999.0, &mut s, fx.ctx()).unwrap(), StepOutcome::Idle);
}

#[test]
fn dissolve_is_reproducible_with_a_seed() {
    let fx = Fixture::new();
    let run = || {
        let mut e = engine(TransitionKind::Dissolve);
        let mut s = PixmapSurface::new(W, H).unwrap();
        block_on(e.request(0, 1, &fx.clock, &mut s, fx.ctx())).unwrap();
        e.step(1_300.0, &mut s, fx.ctx()).unwrap();
        s.read_pixels()
    };
    assert_eq!(run(), run());
}

#[test]
fn out_of_range_request_is_an_error() {
    let fx = Fixture::new();
    let mut e = engine(TransitionKind::Fade);
    let mut s = PixmapSurface::new(W, H).unwrap();
    assert!(block_on(e.request(0, 9, &fx.clock, &mut s, fx.ctx())).is_err());
}
