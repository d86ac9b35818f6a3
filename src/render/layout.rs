use crate::foundation::core::Rect;

/// Largest rect with the source aspect ratio that fits inside `area`, centered.
pub fn contain_fit(src_width: u32, src_height: u32, area: Rect) -> Rect {
    if src_width == 0 || src_height == 0 || area.width() <= 0.0 || area.height() <= 0.0 {
        return Rect::new(area.x0, area.y0, area.x0, area.y0);
    }
    let img_ratio = f64::from(src_width) / f64::from(src_height);
    let area_ratio = area.width() / area.height();

    let (w, h) = if img_ratio > area_ratio {
        (area.width(), area.width() / img_ratio)
    } else {
        (area.height() * img_ratio, area.height())
    };
    let x = area.x0 + (area.width() - w) / 2.0;
    let y = area.y0 + (area.height() - h) / 2.0;
    Rect::new(x, y, x + w, y + h)
}

/// Overlay band geometry for a surface, scaled from nominal sizes at the reference width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayMetrics {
    pub scale: f64,
    pub band: Rect,
    pub padding: f64,
    pub period_size: f64,
    pub period_y: f64,
    pub value_size: f64,
    pub value_y: f64,
    pub label_size: f64,
    pub label_y: f64,
    pub description_size: f64,
    pub description_y: f64,
    pub cloud_size: f64,
    pub cloud_y: f64,
}

impl OverlayMetrics {
    pub fn new(width: u32, height: u32, reference_width: f64) -> Self {
        let scale = scale_for(width, reference_width);
        let w = f64::from(width);
        let h = f64::from(height);
        let band_height = (120.0 * scale).min(h);
        Self {
            scale,
            band: Rect::new(0.0, h - band_height, w, h),
            padding: 20.0 * scale,
            period_size: 28.0 * scale,
            period_y: h - 80.0 * scale,
            value_size: 48.0 * scale,
            value_y: h - 35.0 * scale,
            label_size: 20.0 * scale,
            label_y: h - 70.0 * scale,
            description_size: 16.0 * scale,
            description_y: h - 45.0 * scale,
            cloud_size: 14.0 * scale,
            cloud_y: h - 20.0 * scale,
        }
    }
}

/// Ratio of the surface width to the reference width.
pub fn scale_for(width: u32, reference_width: f64) -> f64 {
    if reference_width > 0.0 {
        f64::from(width) / reference_width
    } else {
        1.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
