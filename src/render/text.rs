use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};

use anyhow::Context as _;
use tracing::debug;

use crate::foundation::core::Point;
use crate::foundation::error::TimelineResult;
use crate::render::surface::{TextAlign, TextBaseline, TextStyle};

const FONT_FAMILY: &str = "'DejaVu Sans', 'Noto Sans', 'Liberation Sans', Arial, sans-serif";

/// Average advance of one character relative to the font size, used when no font can shape the
/// text.
const FALLBACK_ADVANCE: f64 = 0.55;

static FONTDB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

/// Process-wide system font database, loaded on first use.
pub(crate) fn fontdb() -> Arc<usvg::fontdb::Database> {
    Arc::clone(FONTDB.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        debug!(faces = db.len(), "loaded system fonts");
        Arc::new(db)
    }))
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Not representable in XML 1.0.
            c if c < ' ' && !matches!(c, '\t' | '\n' | '\r') => {}
            _ => out.push(c),
        }
    }
    out
}

/// Single-`<text>` SVG document of `width x height` pixels.
pub(crate) fn text_svg(text: &str, at: Point, style: &TextStyle, width: u32, height: u32) -> String {
    let anchor = match style.align {
        TextAlign::Left => "start",
        TextAlign::Center => "middle",
        TextAlign::Right => "end",
    };
    let baseline = match style.baseline {
        TextBaseline::Alphabetic => "alphabetic",
        TextBaseline::Middle => "central",
        TextBaseline::Top => "text-before-edge",
    };
    let c = style.color;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">"#
    );
    let _ = write!(
        svg,
        r##"<text x="{:.2}" y="{:.2}" font-family="{FONT_FAMILY}" font-size="{:.2}" font-weight="{}" fill="#{:02x}{:02x}{:02x}" fill-opacity="{:.4}" text-anchor="{anchor}" dominant-baseline="{baseline}">{}</text></svg>"##,
        at.x,
        at.y,
        style.size,
        if style.bold { "bold" } else { "normal" },
        c.r,
        c.g,
        c.b,
        f64::from(c.a) / 255.0,
        escape_xml(text),
    );
    svg
}

pub(crate) fn parse_svg(svg: &str) -> TimelineResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb: fontdb(),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg, &opts).context("parse text svg")?;
    Ok(tree)
}

/// Rasterize `text` directly onto `pixmap` (source-over).
pub(crate) fn draw_text(
    pixmap: &mut resvg::tiny_skia::Pixmap,
    text: &str,
    at: Point,
    style: &TextStyle,
) -> TimelineResult<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    let svg = text_svg(text, at, style, pixmap.width(), pixmap.height());
    let tree = parse_svg(&svg)?;
    resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    Ok(())
}

/// Approximate advance width from the character count.
pub(crate) fn fallback_width(text: &str, style: &TextStyle) -> f64 {
    text.chars().count() as f64 * style.size * FALLBACK_ADVANCE
}

/// Ink width of `text`, falling back to [`fallback_width`] when shaping yields nothing.
pub(crate) fn measure_text(text: &str, style: &TextStyle) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let probe = TextStyle {
        align: TextAlign::Left,
        baseline: TextBaseline::Alphabetic,
        ..style.clone()
    };
    let width = (fallback_width(text, style) * 2.0 + style.size * 2.0).ceil() as u32;
    let height = (style.size * 2.0).ceil() as u32;
    let svg = text_svg(text, Point::new(0.0, style.size), &probe, width.max(1), height.max(1));

    match parse_svg(&svg) {
        Ok(tree) if tree.root().has_children() => {
            let w = f64::from(tree.root().abs_bounding_box().width());
            if w > 0.0 { w } else { fallback_width(text, style) }
        }
        _ => fallback_width(text, style),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
