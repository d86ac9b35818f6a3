use crate::foundation::core::Rgba8;
use crate::model::frame::{Frame, Trend};

const GREEN: Rgba8 = Rgba8::rgb(0x28, 0xa7, 0x45);
const RED: Rgba8 = Rgba8::rgb(0xdc, 0x35, 0x45);
const TEAL: Rgba8 = Rgba8::rgb(0x17, 0xa2, 0xb8);
const AMBER: Rgba8 = Rgba8::rgb(0xff, 0xc1, 0x07);
const GREY: Rgba8 = Rgba8::rgb(0x6c, 0x75, 0x7d);

/// Pictogram + text + color triple shown in the metadata panel.
#[derive(Clone, Debug, PartialEq)]
pub struct Badge {
    pub icon: String,
    pub text: String,
    pub color: Rgba8,
}

/// Data-quality tier derived from the feed's free-form quality label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualityTier {
    Excellent,
    Good,
    Acceptable,
    Poor,
}

impl QualityTier {
    /// Classify a quality label; unknown labels count as [`QualityTier::Poor`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "excelente" | "excellent" => Self::Excellent,
            "buena" | "good" => Self::Good,
            "aceptable" | "acceptable" => Self::Acceptable,
            _ => Self::Poor,
        }
    }

    pub fn stars(self) -> &'static str {
        match self {
            Self::Excellent => "⭐⭐⭐",
            Self::Good => "⭐⭐",
            Self::Acceptable => "⭐",
            Self::Poor => "⚠️",
        }
    }

    pub fn color(self) -> Rgba8 {
        match self {
            Self::Excellent => GREEN,
            Self::Good => TEAL,
            Self::Acceptable => AMBER,
            Self::Poor => RED,
        }
    }
}

/// Text content of the side panel describing the committed frame.
#[derive(Clone, Debug, PartialEq)]
pub struct MetadataPanel {
    pub period: String,
    pub index_icon: Option<String>,
    /// Formatted average (`0.000`), or `-` when absent.
    pub index_value: String,
    pub trend: Badge,
    pub quality: Badge,
    pub summary: Option<String>,
    /// `position / total`, 1-based.
    pub counter: String,
}

impl MetadataPanel {
    /// Build the panel for `frame` at `position` of `total`, showing `index`.
    pub fn build(frame: &Frame, index: &str, position: usize, total: usize) -> Self {
        let classification = frame.classification(index);
        Self {
            period: frame.label.clone(),
            index_icon: classification.map(|c| c.icon.clone()),
            index_value: frame
                .average(index)
                .map(|v| format!("{v:.3}"))
                .unwrap_or_else(|| "-".to_string()),
            trend: trend_badge(frame, index),
            quality: quality_badge(frame.quality.as_deref()),
            summary: frame.summary.clone(),
            counter: frame_counter(position, total),
        }
    }
}

/// `"i / N"` with a 1-based position.
pub fn frame_counter(position: usize, total: usize) -> String {
    format!("{} / {}", position + 1, total)
}

/// Signed percentage with one decimal, e.g. `+3.2%`.
pub fn signed_percent(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.1}%")
}

/// Accent color of a trend.
pub fn trend_color(trend: Trend) -> Rgba8 {
    match trend {
        Trend::Improve => GREEN,
        Trend::Worsen => RED,
        Trend::Stable => GREY,
    }
}

fn trend_badge(frame: &Frame, index: &str) -> Badge {
    match frame.comparison(index) {
        Some(cmp) => Badge {
            icon: cmp
                .icon
                .clone()
                .unwrap_or_else(|| cmp.trend.icon().to_string()),
            text: signed_percent(cmp.percent_change),
            color: trend_color(cmp.trend),
        },
        None => Badge {
            icon: "➡️".to_string(),
            text: "First period".to_string(),
            color: GREY,
        },
    }
}

fn quality_badge(quality: Option<&str>) -> Badge {
    match quality {
        Some(label) => {
            let tier = QualityTier::from_label(label);
            Badge {
                icon: tier.stars().to_string(),
                text: capitalize(label),
                color: tier.color(),
            }
        }
        None => Badge {
            icon: "❓".to_string(),
            text: "No data".to_string(),
            color: GREY,
        },
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/panel.rs"]
mod tests;
