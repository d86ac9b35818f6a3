//! Satlapse animates a time-ordered sequence of satellite index snapshots.
//!
//! The public API is player-oriented:
//!
//! - Parse a frame feed ([`parse_feed`], [`FeedClient`]) into a [`FrameSequence`]
//! - Construct a [`TimelinePlayer`] over any [`Surface`] with an injected [`PlayerConfig`]
//! - Drive playback with [`TimelinePlayer::tick`] from the host loop
//! - Export the sequence into a [`FrameSink`] ([`InMemorySink`], [`FfmpegSink`])
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod assets;
pub(crate) mod config;
pub(crate) mod effects;
pub(crate) mod encode;
pub(crate) mod export;
pub(crate) mod model;
pub(crate) mod playback;
pub(crate) mod player;
pub(crate) mod remote;
pub(crate) mod render;

pub use crate::foundation::core::{Fps, FrameIndex, Point, Rect, Rgba8, Size};
pub use crate::foundation::error::{TimelineError, TimelineResult};

pub use crate::animation::clock::{Clock, ManualClock, MonotonicClock};
pub use crate::animation::ease::Ease;
pub use crate::assets::cache::{FetchDecodeLoader, ImageCache, ImageHandle, ImageLoader};
pub use crate::assets::fetch::{Fetcher, FsFetcher, HttpFetcher};
pub use crate::assets::image::{PreparedImage, decode_image};
pub use crate::config::{
    ExportConfig, ExportLayout, MAX_TRANSITION_MS, PlaybackConfig, PlaybackSpeed, PlayerConfig,
    RenderConfig, TransitionConfig,
};
pub use crate::effects::composite::{dissolve_in_place, fade_in_place, slide_in_place};
pub use crate::effects::transitions::{TransitionKind, parse_transition};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::export::video::{CancelToken, ExportReport, VideoExporter};
pub use crate::model::feed::{Feed, parse_feed};
pub use crate::model::frame::{
    Classification, Climate, Comparison, Frame, ImageMetadata, IndexMetric, Period, Trend,
};
pub use crate::model::panel::{Badge, MetadataPanel, QualityTier};
pub use crate::model::sequence::FrameSequence;
pub use crate::playback::scheduler::{PendingTick, PlaybackScheduler, PlaybackState};
pub use crate::playback::transition::{
    RenderContext, StepOutcome, TransitionEngine, TransitionOutcome, TransitionState,
};
pub use crate::player::{FeedStatus, Notice, Tick, TimelinePlayer};
pub use crate::remote::{FeedClient, VideoDownload, suggested_file_name};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::pixmap::PixmapSurface;
pub use crate::render::renderer::{
    Interpolation, NO_IMAGERY_MESSAGE, PlaceholderContent, Renderer, placeholder_content,
};
pub use crate::render::report::{REPORT_TITLE, ReportContext, draw_report};
pub use crate::render::surface::{GradientStop, Paint, Surface, TextAlign, TextBaseline, TextStyle};
