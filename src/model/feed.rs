use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::foundation::error::{TimelineError, TimelineResult};
use crate::model::frame::{
    Classification, Climate, Comparison, Frame, ImageMetadata, IndexMetric, Period,
};
use crate::model::sequence::FrameSequence;

/// Parsed frame feed.
#[derive(Clone, Debug, PartialEq)]
pub struct Feed {
    /// Frames in period order.
    pub sequence: FrameSequence,
    /// Display name of the parcel the feed describes.
    pub parcel_name: Option<String>,
}

#[derive(serde::Deserialize)]
struct Envelope {
    #[serde(default)]
    error: bool,
    #[serde(rename = "mensaje", alias = "message", default)]
    message: Option<String>,
    #[serde(rename = "parcela", alias = "parcel", default)]
    parcel: Option<ParcelRecord>,
    #[serde(default)]
    frames: Vec<serde_json::Value>,
}

#[derive(serde::Deserialize)]
struct ParcelRecord {
    #[serde(rename = "nombre", alias = "name", default)]
    name: Option<String>,
}

#[derive(serde::Deserialize)]
struct FrameRecord {
    #[serde(rename = "año", alias = "year")]
    year: i32,
    #[serde(rename = "mes", alias = "month")]
    month: u8,
    #[serde(rename = "periodo_texto", alias = "period_label")]
    label: String,
    #[serde(rename = "imagenes", alias = "images", default)]
    images: BTreeMap<String, Option<String>>,
    #[serde(rename = "clasificaciones", alias = "classifications", default)]
    classifications: BTreeMap<String, Classification>,
    #[serde(rename = "comparacion", alias = "comparisons", default)]
    comparisons: Option<BTreeMap<String, Option<Comparison>>>,
    #[serde(rename = "calidad_datos", alias = "quality", default)]
    quality: Option<String>,
    #[serde(rename = "temperatura", alias = "temperature", default)]
    temperature: Option<f64>,
    #[serde(rename = "precipitacion", alias = "precipitation", default)]
    precipitation: Option<f64>,
    #[serde(rename = "imagen_metadata", alias = "image_metadata", default)]
    image_meta: Option<ImageMetadata>,
    #[serde(rename = "resumen_simple", alias = "summary", default)]
    summary: Option<String>,
    #[serde(flatten)]
    rest: BTreeMap<String, serde_json::Value>,
}

#[derive(serde::Deserialize, Default)]
struct StatsRecord {
    #[serde(rename = "promedio", alias = "average", default)]
    average: Option<f64>,
    #[serde(rename = "maximo", alias = "maximum", default)]
    maximum: Option<f64>,
    #[serde(rename = "minimo", alias = "minimum", default)]
    minimum: Option<f64>,
}

impl FrameRecord {
    fn into_frame(self) -> Frame {
        let mut names: Vec<String> = self
            .classifications
            .keys()
            .chain(self.images.keys())
            .cloned()
            .collect();
        for (key, value) in &self.rest {
            if value.get("promedio").is_some() || value.get("average").is_some() {
                names.push(key.clone());
            }
        }
        names.sort();
        names.dedup();

        let mut classifications = self.classifications;
        let mut metrics = BTreeMap::new();
        for name in names {
            let stats = self
                .rest
                .get(&name)
                .and_then(|v| serde_json::from_value::<StatsRecord>(v.clone()).ok())
                .unwrap_or_default();
            metrics.insert(
                name.clone(),
                IndexMetric {
                    average: stats.average,
                    maximum: stats.maximum,
                    minimum: stats.minimum,
                    classification: classifications.remove(&name),
                },
            );
        }

        Frame {
            period: Period {
                year: self.year,
                month: self.month,
            },
            label: self.label,
            metrics,
            images: self.images,
            comparisons: self
                .comparisons
                .unwrap_or_default()
                .into_iter()
                .filter_map(|(index, cmp)| cmp.map(|c| (index, c)))
                .collect(),
            quality: self.quality.filter(|q| !q.trim().is_empty()),
            image_meta: self.image_meta.unwrap_or_default(),
            climate: Climate {
                temperature_c: self.temperature,
                precipitation_mm: self.precipitation,
            },
            summary: self.summary,
        }
    }
}

/// Parse a frame-feed response body.
///
/// Envelope-level errors and malformed bodies map to [`TimelineError::FeedLoad`]. Individual frame
/// records flagged with `"error": true` are skipped.
pub fn parse_feed(bytes: &[u8]) -> TimelineResult<Feed> {
    let envelope: Envelope = serde_json::from_slice(bytes)
        .map_err(|e| TimelineError::feed_load(format!("malformed feed body: {e}")))?;

    if envelope.error {
        return Err(TimelineError::feed_load(
            envelope
                .message
                .unwrap_or_else(|| "unknown feed error".to_string()),
        ));
    }

    let mut frames = Vec::with_capacity(envelope.frames.len());
    for (pos, raw) in envelope.frames.into_iter().enumerate() {
        if raw.get("error").and_then(|v| v.as_bool()) == Some(true) {
            warn!(position = pos, "skipping frame record flagged as error");
            continue;
        }
        let record: FrameRecord = serde_json::from_value(raw).map_err(|e| {
            TimelineError::feed_load(format!("malformed frame record at position {pos}: {e}"))
        })?;
        frames.push(record.into_frame());
    }

    let sequence =
        FrameSequence::new(frames).map_err(|e| TimelineError::feed_load(e.to_string()))?;
    debug!(frames = sequence.len(), "feed parsed");

    Ok(Feed {
        sequence,
        parcel_name: envelope.parcel.and_then(|p| p.name),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/model/feed.rs"]
mod tests;
