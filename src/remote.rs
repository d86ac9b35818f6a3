use std::path::Path;

use anyhow::Context as _;
use tracing::{info, instrument};

use crate::assets::fetch::Fetcher;
use crate::encode::ffmpeg::ensure_parent_dir;
use crate::foundation::error::{TimelineError, TimelineResult};
use crate::model::feed::{Feed, parse_feed};

/// Placeholder replaced by the index name in download URL templates.
pub const INDEX_PLACEHOLDER: &str = "{index}";

/// Fetches and parses the frame feed of one parcel.
#[derive(Clone, Debug)]
pub struct FeedClient<F: Fetcher> {
    fetcher: F,
}

impl<F: Fetcher> FeedClient<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Any failure, transport or body, is a [`TimelineError::FeedLoad`].
    #[instrument(skip(self))]
    pub async fn load(&self, url: &str) -> TimelineResult<Feed> {
        let body = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| TimelineError::feed_load(format!("fetch feed '{url}': {e}")))?;
        parse_feed(&body)
    }
}

/// Download action for videos rendered server-side, e.g.
/// `/parcels/7/timeline/video?index={index}`.
#[derive(Clone, Debug)]
pub struct VideoDownload<F: Fetcher> {
    fetcher: F,
    template: String,
}

impl<F: Fetcher> VideoDownload<F> {
    pub fn new(fetcher: F, template: impl Into<String>) -> TimelineResult<Self> {
        let template = template.into();
        if !template.contains(INDEX_PLACEHOLDER) {
            return Err(TimelineError::validation(format!(
                "video url template '{template}' lacks {INDEX_PLACEHOLDER}"
            )));
        }
        Ok(Self { fetcher, template })
    }

    pub fn url_for(&self, index: &str) -> String {
        self.template.replace(INDEX_PLACEHOLDER, index)
    }

    /// Fetch the media stream for `index`. Failures are export errors.
    #[instrument(skip(self))]
    pub async fn download(&self, index: &str) -> TimelineResult<Vec<u8>> {
        let url = self.url_for(index);
        let bytes = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|e| TimelineError::export(format!("video download '{url}': {e}")))?;
        if bytes.is_empty() {
            return Err(TimelineError::export(format!("video download '{url}' was empty")));
        }
        Ok(bytes)
    }

    /// Download and save to `path`, returning the byte count.
    pub async fn download_to(&self, index: &str, path: &Path) -> TimelineResult<usize> {
        let bytes = self.download(index).await?;
        ensure_parent_dir(path)?;
        std::fs::write(path, &bytes)
            .with_context(|| format!("write video '{}'", path.display()))?;
        info!(path = %path.display(), bytes = bytes.len(), "video saved");
        Ok(bytes.len())
    }
}

/// `timeline_<parcel>_<INDEX>_<YYYY-MM-DD>.mp4`, with path-hostile characters in the parcel name
/// replaced by `_`.
pub fn suggested_file_name(parcel: &str, index: &str, date: chrono::NaiveDate) -> String {
    let parcel: String = parcel
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "timeline_{parcel}_{}_{}.mp4",
        index.to_uppercase(),
        date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
#[path = "../tests/unit/remote.rs"]
mod tests;
