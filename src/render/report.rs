use crate::assets::image::PreparedImage;
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::TimelineResult;
use crate::model::frame::{Frame, Trend};
use crate::model::panel::{QualityTier, capitalize, signed_percent};
use crate::render::layout::contain_fit;
use crate::render::surface::{GradientStop, Paint, Surface, TextAlign, TextStyle};

const REFERENCE_WIDTH: f64 = 1200.0;
const REFERENCE_HEIGHT: f64 = 600.0;

const HEADER_GREEN: Rgba8 = Rgba8::rgba(46, 139, 87, 230);
const BG_TOP: Rgba8 = Rgba8::rgb(0x1a, 0x1a, 0x1a);
const BG_BOTTOM: Rgba8 = Rgba8::rgb(0x2d, 0x2d, 0x2d);
const PANEL_BG: Rgba8 = Rgba8::rgba(30, 30, 30, 242);
const CAPTION: Rgba8 = Rgba8::rgb(0x88, 0x88, 0x88);
const MUTED: Rgba8 = Rgba8::rgb(0xaa, 0xaa, 0xaa);
const TEAL: Rgba8 = Rgba8::rgb(0x17, 0xa2, 0xb8);
const ORANGE: Rgba8 = Rgba8::rgb(0xff, 0x98, 0x00);
const BLUE: Rgba8 = Rgba8::rgb(0x21, 0x96, 0xf3);
const GREEN: Rgba8 = Rgba8::rgb(0x28, 0xa7, 0x45);
const RED: Rgba8 = Rgba8::rgb(0xdc, 0x35, 0x45);
const AMBER: Rgba8 = Rgba8::rgb(0xff, 0xc1, 0x07);
const NEUTRAL: Rgba8 = Rgba8::rgb(0x6c, 0x75, 0x7d);

/// Title drawn in the report header.
pub const REPORT_TITLE: &str = "🌾 Satellite Timeline";

/// Static text of a report card that does not come from the frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportContext {
    pub parcel_name: String,
    /// Left footer line, e.g. the generation date.
    pub footer: Option<String>,
}

/// Frame-independent geometry scaled from the 1200x600 reference layout.
struct Grid {
    kx: f64,
    ky: f64,
    k: f64,
    w: f64,
}

impl Grid {
    fn new(width: u32, height: u32) -> Self {
        let kx = f64::from(width) / REFERENCE_WIDTH;
        let ky = f64::from(height) / REFERENCE_HEIGHT;
        Self {
            kx,
            ky,
            k: kx.min(ky),
            w: f64::from(width),
        }
    }

    fn x(&self, v: f64) -> f64 {
        v * self.kx
    }

    fn y(&self, v: f64) -> f64 {
        v * self.ky
    }

    fn style(&self, size: f64, color: Rgba8) -> TextStyle {
        TextStyle::new(size * self.k, color)
    }

    fn centered(&self, size: f64, color: Rgba8) -> TextStyle {
        self.style(size, color).align(TextAlign::Center)
    }
}

/// Export composition: header, main visual with an index badge, and a four-column data panel.
pub fn draw_report<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &Frame,
    index: &str,
    image: Option<&PreparedImage>,
    ctx: &ReportContext,
) -> TimelineResult<()> {
    let g = Grid::new(surface.width(), surface.height());
    let full = surface.rect();
    let class = frame.classification(index);
    let base = class.map(|c| c.color).unwrap_or(NEUTRAL);
    let icon = class.map(|c| c.icon.as_str()).unwrap_or("❓");
    let label = class.map(|c| c.label.as_str()).unwrap_or("No data");
    let value = frame
        .average(index)
        .map(|v| format!("{v:.3}"))
        .unwrap_or_else(|| "-".to_string());
    let index_upper = index.to_uppercase();

    surface.fill_rect(
        full,
        &Paint::LinearGradient {
            start: Point::new(0.0, 0.0),
            end: Point::new(0.0, full.y1),
            stops: vec![
                GradientStop::new(0.0, BG_TOP),
                GradientStop::new(1.0, BG_BOTTOM),
            ],
        },
    )?;

    // Header.
    surface.fill_rect(Rect::new(0.0, 0.0, g.w, g.y(80.0)), &Paint::Solid(HEADER_GREEN))?;
    surface.fill_text(
        REPORT_TITLE,
        Point::new(g.x(30.0), g.y(35.0)),
        &g.style(28.0, Rgba8::WHITE).bold(),
    )?;
    surface.fill_text(
        &format!("Parcel: {}", ctx.parcel_name),
        Point::new(g.x(30.0), g.y(62.0)),
        &g.style(20.0, Rgba8::WHITE),
    )?;
    surface.fill_text(
        &frame.label,
        Point::new(g.w - g.x(30.0), g.y(50.0)),
        &g.style(24.0, Rgba8::WHITE).bold().align(TextAlign::Right),
    )?;

    // Main area.
    let main = Rect::new(g.x(50.0), g.y(100.0), g.w - g.x(50.0), g.y(440.0));
    let badge_border = match image {
        Some(image) => {
            surface.draw_image(image, contain_fit(image.width, image.height, main))?;
            base
        }
        None => {
            surface.fill_rect(
                main,
                &Paint::RadialGradient {
                    center: main.center(),
                    radius: 350.0 * g.k,
                    stops: vec![
                        GradientStop::new(0.0, base.with_alpha(0.9)),
                        GradientStop::new(1.0, base.with_alpha(0.3)),
                    ],
                },
            )?;
            Rgba8::WHITE
        }
    };

    let badge_cx = g.w - g.x(80.0);
    let badge_y = main.y0 + g.y(15.0);
    let badge = Rect::new(
        badge_cx - g.x(80.0),
        badge_y,
        badge_cx + g.x(80.0),
        badge_y + g.y(60.0),
    );
    surface.fill_rounded_rect(badge, 8.0 * g.k, &Paint::Solid(Rgba8::BLACK.with_alpha(0.75)))?;
    surface.stroke_rounded_rect(badge, 8.0 * g.k, badge_border, 3.0 * g.k)?;
    surface.fill_text(
        &index_upper,
        Point::new(badge_cx, badge_y + g.y(20.0)),
        &g.centered(14.0, Rgba8::WHITE).bold(),
    )?;
    let value_color = if image.is_some() { base } else { Rgba8::WHITE };
    surface.fill_text(
        &value,
        Point::new(badge_cx, badge_y + g.y(42.0)),
        &g.centered(20.0, value_color).bold(),
    )?;
    surface.fill_text(
        &format!("{icon} {label}"),
        Point::new(badge_cx, badge_y + g.y(58.0)),
        &g.centered(16.0, Rgba8::WHITE),
    )?;
    surface.stroke_rounded_rect(main, 0.0, base, 6.0 * g.k)?;

    // Data panel.
    let bottom = g.y(460.0);
    surface.fill_rect(
        Rect::new(0.0, bottom, g.w, bottom + g.y(140.0)),
        &Paint::Solid(PANEL_BG),
    )?;
    surface.fill_rect(
        Rect::new(0.0, bottom - 2.0 * g.k, g.w, bottom + 2.0 * g.k),
        &Paint::Solid(base),
    )?;

    let col = g.w / 4.0;
    let at = |c: f64, dy: f64| Point::new(col * c, bottom + g.y(dy));

    surface.fill_text(&format!("INDEX {index_upper}"), at(0.5, 30.0), &g.centered(16.0, CAPTION))?;
    surface.fill_text(icon, at(0.5, 60.0), &g.centered(28.0, Rgba8::WHITE))?;
    surface.fill_text(&value, at(0.5, 95.0), &g.centered(32.0, base).bold())?;
    surface.fill_text(label, at(0.5, 118.0), &g.centered(18.0, MUTED).bold())?;

    surface.fill_text("CHANGE VS PREVIOUS", at(1.5, 30.0), &g.centered(16.0, CAPTION))?;
    match frame.comparison(index) {
        Some(cmp) => {
            let color = match cmp.trend {
                Trend::Improve => GREEN,
                Trend::Worsen => RED,
                Trend::Stable => AMBER,
            };
            let icon = cmp.icon.as_deref().unwrap_or(cmp.trend.icon());
            surface.fill_text(
                &format!("{icon} {}", signed_percent(cmp.percent_change)),
                at(1.5, 70.0),
                &g.centered(32.0, color).bold(),
            )?;
            surface.fill_text(cmp.trend.label(), at(1.5, 95.0), &g.centered(18.0, MUTED).bold())?;
        }
        None => {
            surface.fill_text("First period", at(1.5, 70.0), &g.centered(24.0, CAPTION).bold())?;
        }
    }

    surface.fill_text("OTHER INDICES", at(2.5, 30.0), &g.centered(16.0, CAPTION))?;
    for (row, name) in frame.index_names().filter(|n| *n != index).take(2).enumerate() {
        let v = frame.average(name).unwrap_or(0.0);
        surface.fill_text(
            &format!("{}: {v:.3}", name.to_uppercase()),
            at(2.5, 60.0 + 28.0 * row as f64),
            &g.centered(20.0, TEAL).bold(),
        )?;
    }

    surface.fill_text("CLIMATE & QUALITY", at(3.5, 30.0), &g.centered(16.0, CAPTION))?;
    if let Some(t) = frame.climate.temperature_c {
        surface.fill_text(&format!("🌡️ {t:.1}°C"), at(3.5, 58.0), &g.centered(20.0, ORANGE).bold())?;
    }
    if let Some(p) = frame.climate.precipitation_mm {
        surface.fill_text(&format!("💧 {p:.1}mm"), at(3.5, 82.0), &g.centered(20.0, BLUE).bold())?;
    }
    if let Some(quality) = frame.quality.as_deref() {
        let tier = QualityTier::from_label(quality);
        surface.fill_text(tier.stars(), at(3.5, 106.0), &g.centered(20.0, tier.color()))?;
        surface.fill_text(
            &capitalize(quality),
            at(3.5, 125.0),
            &g.centered(16.0, tier.color()).bold(),
        )?;
    }

    if let Some(footer) = &ctx.footer {
        surface.fill_text(
            footer,
            Point::new(g.x(30.0), bottom + g.y(125.0)),
            &g.style(14.0, Rgba8::WHITE.with_alpha(0.5)),
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/report.rs"]
mod tests;
