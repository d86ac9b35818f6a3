use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use futures::future::{BoxFuture, FutureExt};
use tracing::debug;

use crate::foundation::error::{TimelineError, TimelineResult};

/// Byte source for feed bodies and frame imagery.
pub trait Fetcher: Send + Sync {
    /// Fetch the resource at `url`. The returned future must not borrow `self`.
    fn fetch(&self, url: &str) -> BoxFuture<'static, TimelineResult<Vec<u8>>>;
}

impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    fn fetch(&self, url: &str) -> BoxFuture<'static, TimelineResult<Vec<u8>>> {
        (**self).fetch(url)
    }
}

/// Serves URLs from a local media root, e.g. `/media/timeline/ndvi_2024_01.png` or
/// `file:///media/...`.
///
/// Reads are synchronous: the returned future blocks the thread that polls it while the file is
/// read. Hosts on an async runtime should prefer [`HttpFetcher`] or a fetcher of their own.
#[derive(Clone, Debug)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map `url` below the media root.
    pub fn resolve(&self, url: &str) -> TimelineResult<PathBuf> {
        let stripped = url.strip_prefix("file://").unwrap_or(url);
        let rel = normalize_rel_path(stripped.trim_start_matches('/'))?;
        Ok(self.root.join(rel))
    }
}

impl Fetcher for FsFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'static, TimelineResult<Vec<u8>>> {
        read_local(self.resolve(url)).boxed()
    }
}

// Blocking `std::fs::read`, see `FsFetcher`.
async fn read_local(resolved: TimelineResult<PathBuf>) -> TimelineResult<Vec<u8>> {
    let path = resolved?;
    debug!(path = %path.display(), "reading local asset");
    let bytes =
        std::fs::read(&path).with_context(|| format!("read asset '{}'", path.display()))?;
    Ok(bytes)
}

/// HTTP(S) fetcher; relative URLs resolve against `base`.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Option<reqwest::Url>,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base: None,
        }
    }

    pub fn with_base(base: &str) -> TimelineResult<Self> {
        let base = reqwest::Url::parse(base)
            .map_err(|e| TimelineError::validation(format!("invalid base url '{base}': {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base: Some(base),
        })
    }

    pub fn resolve(&self, url: &str) -> TimelineResult<reqwest::Url> {
        match reqwest::Url::parse(url) {
            Ok(abs) => Ok(abs),
            Err(_) => match &self.base {
                Some(base) => base
                    .join(url)
                    .map_err(|e| TimelineError::validation(format!("invalid url '{url}': {e}"))),
                None => Err(TimelineError::validation(format!(
                    "relative url '{url}' without a base url"
                ))),
            },
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'static, TimelineResult<Vec<u8>>> {
        get_bytes(self.client.clone(), self.resolve(url)).boxed()
    }
}

async fn get_bytes(
    client: reqwest::Client,
    resolved: TimelineResult<reqwest::Url>,
) -> TimelineResult<Vec<u8>> {
    let url = resolved?;
    debug!(%url, "http fetch");
    let response = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("send request to '{url}'"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow::anyhow!("GET '{url}' failed with status {status}").into());
    }

    let bytes = response
        .bytes()
        .await
        .with_context(|| format!("read response body of '{url}'"))?;
    Ok(bytes.to_vec())
}

/// Normalize a media-relative path: `/` separators, no `.` segments, no `..`.
pub(crate) fn normalize_rel_path(source: &str) -> TimelineResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(TimelineError::validation("asset paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(TimelineError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(TimelineError::validation("asset path must be non-empty"));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
