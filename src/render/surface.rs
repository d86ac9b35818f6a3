use crate::assets::image::PreparedImage;
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::TimelineResult;

/// Color stop of a gradient [`Paint`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position in `[0, 1]`.
    pub offset: f32,
    pub color: Rgba8,
}

impl GradientStop {
    pub fn new(offset: f32, color: Rgba8) -> Self {
        Self { offset, color }
    }
}

/// Fill source for shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba8),
    LinearGradient {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
    RadialGradient {
        center: Point,
        radius: f64,
        stops: Vec<GradientStop>,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchor of the text origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Middle,
    Top,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size: f64,
    pub bold: bool,
    pub color: Rgba8,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    pub fn new(size: f64, color: Rgba8) -> Self {
        Self {
            size,
            bold: false,
            color,
            align: TextAlign::Left,
            baseline: TextBaseline::Alphabetic,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// Capability set of a 2D drawing target.
///
/// The renderer and the transition engine only talk to this trait, so any raster backend or test
/// double can stand in. Pixel buffers exchanged through [`Surface::read_pixels`] and
/// [`Surface::write_pixels`] are premultiplied RGBA8, row-major, `width * height * 4` bytes.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Replace every pixel with `color`.
    fn clear(&mut self, color: Rgba8) -> TimelineResult<()>;

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> TimelineResult<()>;

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, paint: &Paint) -> TimelineResult<()>;

    fn stroke_rounded_rect(
        &mut self,
        rect: Rect,
        radius: f64,
        color: Rgba8,
        line_width: f64,
    ) -> TimelineResult<()>;

    /// Draw `image` scaled into `dst`.
    fn draw_image(&mut self, image: &PreparedImage, dst: Rect) -> TimelineResult<()>;

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) -> TimelineResult<()>;

    /// Advance width of `text` in pixels.
    fn measure_text(&self, text: &str, style: &TextStyle) -> f64;

    fn read_pixels(&self) -> Vec<u8>;

    fn write_pixels(&mut self, data: &[u8]) -> TimelineResult<()>;

    fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width()), f64::from(self.height()))
    }
}
