use kurbo::{PathEl, RoundedRect, Shape};
use resvg::tiny_skia;
use tracing::trace;

use crate::assets::image::PreparedImage;
use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{TimelineError, TimelineResult};
use crate::render::frame::FrameRGBA;
use crate::render::surface::{Paint, Surface, TextStyle};
use crate::render::text;

/// CPU raster [`Surface`] backed by a `tiny_skia` pixmap.
#[derive(Clone, Debug)]
pub struct PixmapSurface {
    pixmap: tiny_skia::Pixmap,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> TimelineResult<Self> {
        let canvas = Canvas::new(width, height)?;
        let pixmap = tiny_skia::Pixmap::new(canvas.width, canvas.height).ok_or_else(|| {
            TimelineError::render(format!("cannot allocate {width}x{height} surface"))
        })?;
        Ok(Self { pixmap })
    }

    /// Current contents as a premultiplied frame.
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
            data: self.pixmap.data().to_vec(),
            premultiplied: true,
        }
    }

    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }
}

fn color(c: Rgba8) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn ts_point(p: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(p.x as f32, p.y as f32)
}

fn ts_rect(r: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(r.x0 as f32, r.y0 as f32, r.x1 as f32, r.y1 as f32)
}

fn to_paint(paint: &Paint) -> TimelineResult<tiny_skia::Paint<'static>> {
    let mut out = tiny_skia::Paint {
        anti_alias: true,
        ..tiny_skia::Paint::default()
    };
    let stops = |stops: &[crate::render::surface::GradientStop]| {
        stops
            .iter()
            .map(|s| tiny_skia::GradientStop::new(s.offset, color(s.color)))
            .collect::<Vec<_>>()
    };

    match paint {
        Paint::Solid(c) => out.set_color_rgba8(c.r, c.g, c.b, c.a),
        Paint::LinearGradient { start, end, stops: s } => {
            out.shader = tiny_skia::LinearGradient::new(
                ts_point(*start),
                ts_point(*end),
                stops(s),
                tiny_skia::SpreadMode::Pad,
                tiny_skia::Transform::identity(),
            )
            .ok_or_else(|| TimelineError::render("invalid linear gradient"))?;
        }
        Paint::RadialGradient {
            center,
            radius,
            stops: s,
        } => {
            out.shader = tiny_skia::RadialGradient::new(
                ts_point(*center),
                ts_point(*center),
                *radius as f32,
                stops(s),
                tiny_skia::SpreadMode::Pad,
                tiny_skia::Transform::identity(),
            )
            .ok_or_else(|| TimelineError::render("invalid radial gradient"))?;
        }
    }
    Ok(out)
}

fn rounded_path(rect: Rect, radius: f64) -> Option<tiny_skia::Path> {
    let shape = RoundedRect::from_rect(rect, radius.max(0.0));
    let mut pb = tiny_skia::PathBuilder::new();
    for el in shape.path_elements(0.1) {
        match el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

impl Surface for PixmapSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn clear(&mut self, c: Rgba8) -> TimelineResult<()> {
        self.pixmap.fill(color(c));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> TimelineResult<()> {
        let Some(r) = ts_rect(rect) else {
            trace!(?rect, "skipping degenerate rect");
            return Ok(());
        };
        let paint = to_paint(paint)?;
        self.pixmap
            .fill_rect(r, &paint, tiny_skia::Transform::identity(), None);
        Ok(())
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, paint: &Paint) -> TimelineResult<()> {
        let Some(path) = rounded_path(rect, radius) else {
            return Ok(());
        };
        let paint = to_paint(paint)?;
        self.pixmap.fill_path(
            &path,
            &paint,
            tiny_skia::FillRule::Winding,
            tiny_skia::Transform::identity(),
            None,
        );
        Ok(())
    }

    fn stroke_rounded_rect(
        &mut self,
        rect: Rect,
        radius: f64,
        c: Rgba8,
        line_width: f64,
    ) -> TimelineResult<()> {
        let Some(path) = rounded_path(rect, radius) else {
            return Ok(());
        };
        let paint = to_paint(&Paint::Solid(c))?;
        let stroke = tiny_skia::Stroke {
            width: line_width as f32,
            ..tiny_skia::Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint,
            &stroke,
            tiny_skia::Transform::identity(),
            None,
        );
        Ok(())
    }

    fn draw_image(&mut self, image: &PreparedImage, dst: Rect) -> TimelineResult<()> {
        if image.width == 0 || image.height == 0 || dst.width() <= 0.0 || dst.height() <= 0.0 {
            return Ok(());
        }
        let src = tiny_skia::PixmapRef::from_bytes(&image.rgba8_premul, image.width, image.height)
            .ok_or_else(|| TimelineError::render("image buffer does not match its dimensions"))?;
        let sx = (dst.width() / f64::from(image.width)) as f32;
        let sy = (dst.height() / f64::from(image.height)) as f32;
        let xform = tiny_skia::Transform::from_row(sx, 0.0, 0.0, sy, dst.x0 as f32, dst.y0 as f32);
        let paint = tiny_skia::PixmapPaint {
            quality: tiny_skia::FilterQuality::Bilinear,
            ..tiny_skia::PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(0, 0, src, &paint, xform, None);
        Ok(())
    }

    fn fill_text(&mut self, s: &str, at: Point, style: &TextStyle) -> TimelineResult<()> {
        text::draw_text(&mut self.pixmap, s, at, style)
    }

    fn measure_text(&self, s: &str, style: &TextStyle) -> f64 {
        text::measure_text(s, style)
    }

    fn read_pixels(&self) -> Vec<u8> {
        self.pixmap.data().to_vec()
    }

    fn write_pixels(&mut self, data: &[u8]) -> TimelineResult<()> {
        let dst = self.pixmap.data_mut();
        if dst.len() != data.len() {
            return Err(TimelineError::render(format!(
                "write_pixels expects {} bytes, got {}",
                dst.len(),
                data.len()
            )));
        }
        dst.copy_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pixmap.rs"]
mod tests;
