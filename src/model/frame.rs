use std::collections::BTreeMap;

use crate::foundation::core::Rgba8;

/// Calendar month a frame summarizes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Period {
    /// Calendar year.
    pub year: i32,
    /// Month in `1..=12`.
    pub month: u8,
}

impl Period {
    /// `YYYY-MM` key.
    pub fn key(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Categorical health bucket assigned to an index value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Classification {
    /// Display color of the bucket.
    pub color: Rgba8,
    /// Short pictogram (usually an emoji).
    #[serde(rename = "icono", alias = "icon", default)]
    pub icon: String,
    /// Bucket name.
    #[serde(rename = "etiqueta", alias = "label", default)]
    pub label: String,
    /// One-line explanation.
    #[serde(rename = "descripcion", alias = "description", default)]
    pub description: String,
}

/// Summary statistics of one index for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexMetric {
    /// Mean value over the parcel, absent when the upstream computation had no data.
    pub average: Option<f64>,
    /// Maximum value, if reported.
    pub maximum: Option<f64>,
    /// Minimum value, if reported.
    pub minimum: Option<f64>,
    /// Health bucket for `average`.
    pub classification: Option<Classification>,
}

/// Direction of change relative to the previous frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Trend {
    /// Index got better.
    #[serde(rename = "mejora", alias = "improve")]
    Improve,
    /// Index got worse.
    #[serde(rename = "deterioro", alias = "worsen")]
    Worsen,
    /// Change within the noise band.
    #[serde(rename = "estable", alias = "stable")]
    Stable,
}

impl Trend {
    /// Default pictogram when the feed omits one.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Improve => "📈",
            Self::Worsen => "📉",
            Self::Stable => "➡️",
        }
    }

    /// Human label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Improve => "Improving",
            Self::Worsen => "Worsening",
            Self::Stable => "Stable",
        }
    }
}

/// Change of one index relative to the previous frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Comparison {
    /// Percent change versus the previous period.
    #[serde(rename = "porcentaje", alias = "percent_change")]
    pub percent_change: f64,
    /// Direction bucket.
    #[serde(rename = "tendencia", alias = "trend")]
    pub trend: Trend,
    /// Optional pictogram supplied by the feed.
    #[serde(rename = "icono", alias = "icon", default)]
    pub icon: Option<String>,
    /// Optional absolute difference.
    #[serde(rename = "diferencia", alias = "difference", default)]
    pub difference: Option<f64>,
}

/// Acquisition details of the imagery backing a frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageMetadata {
    /// Upstream scene identifier.
    #[serde(default)]
    pub view_id: Option<String>,
    /// Capture date as reported by the feed.
    #[serde(rename = "fecha_captura", alias = "captured_at", default)]
    pub captured_at: Option<String>,
    /// Cloud cover percentage.
    #[serde(rename = "nubosidad", alias = "cloud_cover", default)]
    pub cloud_cover_pct: Option<f64>,
}

/// Optional climate summary of a period.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Climate {
    /// Mean temperature in °C.
    pub temperature_c: Option<f64>,
    /// Total precipitation in mm.
    pub precipitation_mm: Option<f64>,
}

/// One period's snapshot. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Calendar period (sequence sort key).
    pub period: Period,
    /// Display label, e.g. `"Enero 2024"`.
    pub label: String,
    /// Index name -> statistics.
    pub metrics: BTreeMap<String, IndexMetric>,
    /// Index name -> image URL (absent when no imagery was downloaded).
    pub images: BTreeMap<String, Option<String>>,
    /// Index name -> change versus previous frame.
    pub comparisons: BTreeMap<String, Comparison>,
    /// Data quality label (`excelente`, `buena`, `aceptable`, ...).
    pub quality: Option<String>,
    /// Imagery acquisition metadata.
    pub image_meta: ImageMetadata,
    /// Climate fields.
    pub climate: Climate,
    /// Plain-language summary.
    pub summary: Option<String>,
}

impl Frame {
    /// Minimal frame with no metrics or imagery.
    pub fn new(period: Period, label: impl Into<String>) -> Self {
        Self {
            period,
            label: label.into(),
            metrics: BTreeMap::new(),
            images: BTreeMap::new(),
            comparisons: BTreeMap::new(),
            quality: None,
            image_meta: ImageMetadata::default(),
            climate: Climate::default(),
            summary: None,
        }
    }

    /// Builder-style metric insertion.
    pub fn with_metric(mut self, index: impl Into<String>, metric: IndexMetric) -> Self {
        self.metrics.insert(index.into(), metric);
        self
    }

    /// Builder-style image URL insertion.
    pub fn with_image(mut self, index: impl Into<String>, url: Option<String>) -> Self {
        self.images.insert(index.into(), url);
        self
    }

    /// Builder-style comparison insertion.
    pub fn with_comparison(mut self, index: impl Into<String>, cmp: Comparison) -> Self {
        self.comparisons.insert(index.into(), cmp);
        self
    }

    pub fn metric(&self, index: &str) -> Option<&IndexMetric> {
        self.metrics.get(index)
    }

    pub fn average(&self, index: &str) -> Option<f64> {
        self.metric(index).and_then(|m| m.average)
    }

    pub fn classification(&self, index: &str) -> Option<&Classification> {
        self.metric(index).and_then(|m| m.classification.as_ref())
    }

    /// Image URL for `index`; empty strings count as absent.
    pub fn image_url(&self, index: &str) -> Option<&str> {
        self.images
            .get(index)
            .and_then(|u| u.as_deref())
            .filter(|u| !u.trim().is_empty())
    }

    pub fn comparison(&self, index: &str) -> Option<&Comparison> {
        self.comparisons.get(index)
    }

    /// Index names this frame knows about, in name order.
    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }
}
