use tracing::trace;

use crate::assets::image::PreparedImage;
use crate::config::RenderConfig;
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::TimelineResult;
use crate::foundation::math::lerp;
use crate::model::frame::Frame;
use crate::render::layout::{OverlayMetrics, contain_fit, scale_for};
use crate::render::surface::{GradientStop, Paint, Surface, TextAlign, TextBaseline, TextStyle};

pub(crate) const PLACEHOLDER_BG: Rgba8 = Rgba8::rgb(0x1a, 0x1a, 0x1a);
const FALLBACK_TOP: Rgba8 = Rgba8::rgb(0x2e, 0x8b, 0x57);
const FALLBACK_BOTTOM: Rgba8 = Rgba8::rgb(0x1a, 0x4d, 0x2e);
const ERROR_RED: Rgba8 = Rgba8::rgb(0xdc, 0x35, 0x45);
const DESCRIPTION_GREY: Rgba8 = Rgba8::rgb(0xdd, 0xdd, 0xdd);
const CLOUD_GREY: Rgba8 = Rgba8::rgb(0xaa, 0xaa, 0xaa);

/// Message shown by the placeholder when a frame has no classification for the active index.
pub const NO_IMAGERY_MESSAGE: &str = "No imagery available for this period";

/// In-flight transition context for a placeholder render.
#[derive(Clone, Copy, Debug)]
pub struct Interpolation<'a> {
    /// Frame being transitioned away from.
    pub from: &'a Frame,
    /// Eased progress in `[0, 1]`.
    pub progress: f64,
}

/// What the placeholder path shows for one frame.
///
/// During a transition `color` and `value` are blended from the outgoing frame while `icon` and
/// `label` already belong to the target.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceholderContent {
    pub color: Rgba8,
    pub value: f64,
    pub icon: String,
    pub label: String,
}

/// Placeholder content of `frame` for `index`, `None` when the frame lacks a classification or an
/// average for it.
pub fn placeholder_content(
    frame: &Frame,
    index: &str,
    interpolation: Option<Interpolation<'_>>,
) -> Option<PlaceholderContent> {
    let class = frame.classification(index)?;
    let target = frame.average(index)?;

    let mut color = class.color;
    let mut value = target;
    if let Some(interp) = interpolation {
        let from = interp
            .from
            .classification(index)
            .zip(interp.from.average(index));
        if let Some((from_class, from_value)) = from {
            let t = interp.progress.clamp(0.0, 1.0);
            color = from_class.color.lerp(class.color, t);
            value = lerp(from_value, target, t);
        }
    }

    Some(PlaceholderContent {
        color,
        value,
        icon: class.icon.clone(),
        label: class.label.clone(),
    })
}

/// `NDVI: 0.723`
pub fn index_value_text(index: &str, value: f64) -> String {
    format!("{}: {value:.3}", index.to_uppercase())
}

/// Draws one frame, real image or placeholder, plus the metadata overlay.
#[derive(Clone, Debug)]
pub struct Renderer {
    reference_width: f64,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl Renderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            reference_width: config.reference_width,
        }
    }

    pub fn reference_width(&self) -> f64 {
        self.reference_width
    }

    /// Render `frame` for `index`.
    ///
    /// `interpolation` only affects the placeholder path. `overlay` may be turned off for
    /// intermediate transition renders.
    pub fn draw<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        frame: &Frame,
        index: &str,
        image: Option<&PreparedImage>,
        interpolation: Option<Interpolation<'_>>,
        overlay: bool,
    ) -> TimelineResult<()> {
        match image {
            Some(image) => self.draw_image_path(surface, image)?,
            None => self.draw_placeholder(surface, frame, index, interpolation)?,
        }
        if overlay {
            self.draw_overlay(surface, frame, index)?;
        }
        Ok(())
    }

    /// Full render of a committed frame: no interpolation, overlay included.
    pub fn draw_direct<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        frame: &Frame,
        index: &str,
        image: Option<&PreparedImage>,
    ) -> TimelineResult<()> {
        self.draw(surface, frame, index, image, None, true)
    }

    fn draw_image_path<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        image: &PreparedImage,
    ) -> TimelineResult<()> {
        surface.clear(Rgba8::BLACK)?;
        let dst = contain_fit(image.width, image.height, surface.rect());
        trace!(?dst, "drawing frame image");
        surface.draw_image(image, dst)
    }

    fn draw_placeholder<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        frame: &Frame,
        index: &str,
        interpolation: Option<Interpolation<'_>>,
    ) -> TimelineResult<()> {
        let full = surface.rect();
        let (w, h) = (full.width(), full.height());
        let center = full.center();
        let scale = scale_for(surface.width(), self.reference_width);
        surface.clear(PLACEHOLDER_BG)?;

        let Some(content) = placeholder_content(frame, index, interpolation) else {
            return self.draw_placeholder_fallback(surface, scale);
        };

        let base = content.color;
        surface.fill_rect(
            full,
            &Paint::RadialGradient {
                center,
                radius: w.max(h) / 2.0,
                stops: vec![
                    GradientStop::new(0.0, base.with_alpha(0.8)),
                    GradientStop::new(0.5, base.with_alpha(0.5)),
                    GradientStop::new(1.0, base.with_alpha(0.2)),
                ],
            },
        )?;

        let parcel_w = w * 0.7;
        let parcel_h = h * 0.6;
        let parcel = Rect::new(
            (w - parcel_w) / 2.0,
            (h - parcel_h) / 2.0,
            (w + parcel_w) / 2.0,
            (h + parcel_h) / 2.0,
        );
        let radius = 20.0 * scale;
        surface.fill_rounded_rect(parcel, radius, &Paint::Solid(base.with_alpha(0.9)))?;
        surface.stroke_rounded_rect(parcel, radius, Rgba8::WHITE, 3.0 * scale)?;

        let centered = |size: f64, color: Rgba8| {
            TextStyle::new(size * scale, color)
                .align(TextAlign::Center)
                .baseline(TextBaseline::Middle)
        };
        surface.fill_text(
            &content.icon,
            Point::new(center.x, center.y - 20.0 * scale),
            &centered(120.0, Rgba8::WHITE.with_alpha(0.9)),
        )?;
        surface.fill_text(
            &index_value_text(index, content.value),
            Point::new(center.x, center.y + 80.0 * scale),
            &centered(56.0, Rgba8::WHITE).bold(),
        )?;
        surface.fill_text(
            &content.label,
            Point::new(center.x, center.y + 125.0 * scale),
            &centered(28.0, Rgba8::WHITE).bold(),
        )
    }

    fn draw_placeholder_fallback<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        scale: f64,
    ) -> TimelineResult<()> {
        let full = surface.rect();
        let center = full.center();
        surface.fill_rect(
            full,
            &Paint::LinearGradient {
                start: Point::new(0.0, 0.0),
                end: Point::new(full.x1, full.y1),
                stops: vec![
                    GradientStop::new(0.0, FALLBACK_TOP),
                    GradientStop::new(1.0, FALLBACK_BOTTOM),
                ],
            },
        )?;
        let centered = |size: f64, color: Rgba8| {
            TextStyle::new(size * scale, color)
                .align(TextAlign::Center)
                .baseline(TextBaseline::Middle)
        };
        surface.fill_text(
            "🛰️",
            Point::new(center.x, center.y - 40.0 * scale),
            &centered(120.0, Rgba8::WHITE.with_alpha(0.1)),
        )?;
        surface.fill_text(
            NO_IMAGERY_MESSAGE,
            Point::new(center.x, center.y + 60.0 * scale),
            &centered(24.0, Rgba8::WHITE).bold(),
        )
    }

    /// Bottom band with period, index value, classification and cloud cover.
    ///
    /// Frames without a classification for `index` get no overlay.
    pub fn draw_overlay<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        frame: &Frame,
        index: &str,
    ) -> TimelineResult<()> {
        let Some(class) = frame.classification(index) else {
            return Ok(());
        };
        let m = OverlayMetrics::new(surface.width(), surface.height(), self.reference_width);
        let w = f64::from(surface.width());

        surface.fill_rect(
            m.band,
            &Paint::LinearGradient {
                start: Point::new(0.0, m.band.y0),
                end: Point::new(0.0, m.band.y1),
                stops: vec![
                    GradientStop::new(0.0, Rgba8::TRANSPARENT),
                    GradientStop::new(1.0, Rgba8::BLACK.with_alpha(0.85)),
                ],
            },
        )?;

        surface.fill_text(
            &frame.label,
            Point::new(m.padding, m.period_y),
            &TextStyle::new(m.period_size, Rgba8::WHITE).bold(),
        )?;

        if let Some(value) = frame.average(index) {
            surface.fill_text(
                &index_value_text(index, value),
                Point::new(m.padding, m.value_y),
                &TextStyle::new(m.value_size, class.color).bold(),
            )?;
        }

        let right = w - m.padding;
        surface.fill_text(
            &format!("{} {}", class.icon, class.label),
            Point::new(right, m.label_y),
            &TextStyle::new(m.label_size, Rgba8::WHITE)
                .bold()
                .align(TextAlign::Right),
        )?;
        surface.fill_text(
            &class.description,
            Point::new(right, m.description_y),
            &TextStyle::new(m.description_size, DESCRIPTION_GREY).align(TextAlign::Right),
        )?;

        if let Some(cloud) = frame.image_meta.cloud_cover_pct {
            surface.fill_text(
                &format!("☁️ Cloud cover: {cloud:.1}%"),
                Point::new(right, m.cloud_y),
                &TextStyle::new(m.cloud_size, CLOUD_GREY).align(TextAlign::Right),
            )?;
        }
        Ok(())
    }

    /// Blocking error card shown while no feed is loaded.
    pub fn draw_error<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        message: &str,
    ) -> TimelineResult<()> {
        let scale = scale_for(surface.width(), self.reference_width);
        let center = surface.rect().center();
        surface.clear(PLACEHOLDER_BG)?;
        surface.fill_text(
            &format!("❌ {message}"),
            center,
            &TextStyle::new(24.0 * scale, ERROR_RED)
                .bold()
                .align(TextAlign::Center)
                .baseline(TextBaseline::Middle),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
