use std::collections::HashMap;

use futures::executor::block_on;
use futures::future::{self, BoxFuture, FutureExt};

use super::*;
use crate::assets::cache::ImageLoader;
use crate::assets::image::PreparedImage;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Rgba8;
use crate::model::frame::{Classification, Frame, IndexMetric, Period};

struct MapLoader(HashMap<&'static str, [u8; 3]>);

impl ImageLoader for MapLoader {
    fn load(&self, url: &str) -> BoxFuture<'static, TimelineResult<PreparedImage>> {
        let out = match self.0.get(url) {
            Some(rgb) => Ok(PreparedImage::solid(8, 4, *rgb)),
            None => Err(TimelineError::image_load(format!("missing {url}"))),
        };
        future::ready(out).boxed()
    }
}

fn frame(month: u8, url: Option<&str>) -> Frame {
    Frame::new(Period { year: 2024, month }, format!("M{month}"))
        .with_metric(
            "ndvi",
            IndexMetric {
                average: Some(0.1 * f64::from(month)),
                classification: Some(Classification {
                    color: Rgba8::rgb(0, 150, 0),
                    icon: "🌿".to_string(),
                    label: "Healthy".to_string(),
                    description: String::new(),
                }),
                ..IndexMetric::default()
            },
        )
        .with_image("ndvi", url.map(str::to_owned))
}

fn sequence() -> FrameSequence {
    FrameSequence::new(vec![
        frame(1, Some("/ok.png")),
        frame(2, Some("/broken.png")),
        frame(3, None),
        frame(4, Some("/ok.png")),
    ])
    .unwrap()
}

fn exporter(layout: ExportLayout) -> VideoExporter {
    VideoExporter::new(
        ExportConfig {
            width: 64,
            height: 32,
            capture_rate: 2,
            layout,
        },
        Renderer::default(),
    )
}

fn cache() -> ImageCache {
    ImageCache::new(MapLoader(HashMap::from([("/ok.png", [200, 10, 10])])))
}

#[test]
fn one_sample_per_frame_even_when_images_fail() {
    let frames = sequence();
    let mut sink = InMemorySink::new();
    let report = block_on(exporter(ExportLayout::Report).export(
        &frames,
        &cache(),
        "ndvi",
        "Lote 7",
        &mut sink,
        &CancelToken::new(),
    ))
    .unwrap();

    assert_eq!(report.frames_captured, 4);
    assert_eq!(report.placeholders, 2);
    assert_eq!(report.duration_secs, 2.0);
    assert_eq!(sink.frames().len(), 4);
    assert!(sink.is_finished());
    assert_eq!(sink.timestamps(), vec![0.0, 0.5, 1.0, 1.5]);
    assert!(sink.frames().iter().all(|(_, f)| f.width == 64 && f.height == 32));
}

#[test]
fn player_layout_matches_direct_render() {
    let frames = sequence();
    let mut sink = InMemorySink::new();
    let cache = cache();
    block_on(exporter(ExportLayout::Player).export(
        &frames,
        &cache,
        "ndvi",
        "Lote 7",
        &mut sink,
        &CancelToken::new(),
    ))
    .unwrap();

    let mut direct = PixmapSurface::new(64, 32).unwrap();
    let image = block_on(cache.get("/ok.png"));
    Renderer::default()
        .draw_direct(&mut direct, &frames[0], "ndvi", image.as_deref())
        .unwrap();
    assert_eq!(sink.frames()[0].1.data, direct.data());
}

#[test]
fn cancelled_export_stops_before_capturing() {
    let frames = sequence();
    let mut sink = InMemorySink::new();
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = block_on(exporter(ExportLayout::Report).export(
        &frames,
        &cache(),
        "ndvi",
        "Lote 7",
        &mut sink,
        &cancel,
    ))
    .unwrap_err();
    assert!(matches!(err, TimelineError::Export(_)));
    assert!(sink.frames().is_empty());
    assert!(!sink.is_finished());
}

#[test]
fn empty_sequence_is_an_export_error() {
    let frames = FrameSequence::new(Vec::new()).unwrap();
    let mut sink = InMemorySink::new();
    let err = block_on(exporter(ExportLayout::Report).export(
        &frames,
        &cache(),
        "ndvi",
        "",
        &mut sink,
        &CancelToken::new(),
    ))
    .unwrap_err();
    assert!(matches!(err, TimelineError::Export(_)));
}

#[test]
fn footer_uses_iso_date() {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    assert_eq!(generated_footer(date), "Generated: 2024-05-01");
}
