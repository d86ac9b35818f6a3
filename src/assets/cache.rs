use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::future::{self, BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use crate::assets::fetch::Fetcher;
use crate::assets::image::{PreparedImage, decode_image};
use crate::foundation::error::TimelineResult;

/// Shared, immutable decoded image.
pub type ImageHandle = Arc<PreparedImage>;

/// Future handed to every caller of [`ImageCache::get`] for the same URL.
///
/// Resolves to `None` when the image is unavailable.
pub type ImageFuture = Shared<BoxFuture<'static, Option<ImageHandle>>>;

/// Produces decoded imagery for a URL.
pub trait ImageLoader: Send + Sync {
    fn load(&self, url: &str) -> BoxFuture<'static, TimelineResult<PreparedImage>>;
}

/// [`ImageLoader`] that fetches bytes and decodes them with the `image` crate.
#[derive(Clone, Debug)]
pub struct FetchDecodeLoader<F> {
    fetcher: F,
}

impl<F: Fetcher> FetchDecodeLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
}

impl<F: Fetcher> ImageLoader for FetchDecodeLoader<F> {
    fn load(&self, url: &str) -> BoxFuture<'static, TimelineResult<PreparedImage>> {
        self.fetcher
            .fetch(url)
            .map(|bytes| decode_image(&bytes?))
            .boxed()
    }
}

#[derive(Default)]
struct Slots {
    ready: HashMap<String, ImageHandle>,
    in_flight: HashMap<String, ImageFuture>,
}

struct Inner {
    loader: Arc<dyn ImageLoader>,
    slots: Mutex<Slots>,
}

impl Inner {
    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Deduplicating, append-only image cache.
///
/// At most one load per URL is in flight; every concurrent caller awaits the same shared future.
/// Resolved images are kept for the cache's lifetime. Failed loads are logged and not cached, so a
/// later `get` retries.
#[derive(Clone)]
pub struct ImageCache {
    inner: Arc<Inner>,
}

impl ImageCache {
    pub fn new(loader: impl ImageLoader + 'static) -> Self {
        Self::with_loader(Arc::new(loader))
    }

    pub fn with_loader(loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            inner: Arc::new(Inner {
                loader,
                slots: Mutex::new(Slots::default()),
            }),
        }
    }

    /// Cache over `fetcher` with `image`-crate decoding.
    pub fn from_fetcher(fetcher: impl Fetcher + 'static) -> Self {
        Self::new(FetchDecodeLoader::new(fetcher))
    }

    /// Resolve `url`, joining an in-flight load when there is one.
    pub fn get(&self, url: &str) -> ImageFuture {
        let mut slots = self.inner.slots();
        if let Some(handle) = slots.ready.get(url) {
            return future::ready(Some(Arc::clone(handle))).boxed().shared();
        }
        if let Some(pending) = slots.in_flight.get(url) {
            return pending.clone();
        }

        debug!(url, "starting image load");
        let load = self.inner.loader.load(url);
        let shared = settle(Arc::downgrade(&self.inner), url.to_string(), load)
            .boxed()
            .shared();
        slots.in_flight.insert(url.to_string(), shared.clone());
        shared
    }

    /// [`ImageCache::get`] for an optional URL; `None` resolves immediately.
    pub fn get_opt(&self, url: Option<&str>) -> ImageFuture {
        match url {
            Some(url) => self.get(url),
            None => future::ready(None).boxed().shared(),
        }
    }

    /// Already-resolved image, without starting a load.
    pub fn peek(&self, url: &str) -> Option<ImageHandle> {
        self.inner.slots().ready.get(url).cloned()
    }

    /// Warm the cache for `urls`; resolves to the number of images available afterwards.
    pub fn preload<I, S>(&self, urls: I) -> BoxFuture<'static, usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pending: Vec<ImageFuture> = urls.into_iter().map(|u| self.get(u.as_ref())).collect();
        future::join_all(pending)
            .map(|done| done.iter().filter(|h| h.is_some()).count())
            .boxed()
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.inner.slots().ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn in_flight_count(&self) -> usize {
        self.inner.slots().in_flight.len()
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.inner.slots();
        f.debug_struct("ImageCache")
            .field("ready", &slots.ready.len())
            .field("in_flight", &slots.in_flight.len())
            .finish()
    }
}

async fn settle(
    inner: Weak<Inner>,
    url: String,
    load: BoxFuture<'static, TimelineResult<PreparedImage>>,
) -> Option<ImageHandle> {
    let result = load.await;
    let inner = inner.upgrade();
    let mut slots = inner.as_ref().map(|i| i.slots());
    if let Some(slots) = slots.as_mut() {
        slots.in_flight.remove(&url);
    }

    match result {
        Ok(image) => {
            let handle = Arc::new(image);
            if let Some(slots) = slots.as_mut() {
                slots.ready.insert(url, Arc::clone(&handle));
            }
            Some(handle)
        }
        Err(err) => {
            warn!(url, error = %err, "image unavailable, falling back to placeholder");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
