use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::model::errors::{CloudErrKind, CloudResult};
use crate::model::file::{FileItem, FileLocation};
use crate::model::usage::StorageStats;

/// How long a fetched file listing stays fresh.
pub const FILES_TTL: Duration = Duration::from_secs(10);
/// How long fetched storage stats stay fresh.
pub const STATS_TTL: Duration = Duration::from_secs(5);

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, CloudErrKind>>>;

/// Coalesces and throttles fetches of one remote resource.
///
/// While a fetch is in flight every caller awaits the same shared future, so
/// concurrent interest in a resource costs one network call. A completed
/// fetch stays fresh for the slot's ttl; within that window callers get the
/// cached value back without touching the network unless they force a
/// refresh.
#[derive(Clone)]
pub struct ResourceCache<T: Clone> {
    ttl: Duration,
    inner: Arc<Mutex<Inner<T>>>,
}

struct Inner<T> {
    value: Option<T>,
    fetched_at: Option<Instant>,
    in_flight: Option<(u64, SharedFetch<T>)>,
    /// Bumped when a fetch starts. A completion only stamps the cache (and
    /// clears the in-flight slot) if no newer fetch has started since.
    generation: u64,
}

impl<T> Default for Inner<T> {
    fn default() -> Self {
        Self { value: None, fetched_at: None, in_flight: None, generation: 0 }
    }
}

impl<T: Clone + Send + Sync + 'static> ResourceCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, inner: Arc::new(Mutex::new(Inner::default())) }
    }

    /// Returns the cached value, the result of an in-flight fetch, or the
    /// result of a fetch started on behalf of this caller.
    pub async fn get_or_fetch<F, Fut>(&self, force: bool, fetch: F) -> CloudResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CloudResult<T>> + Send + 'static,
    {
        let (generation, fut) = {
            let mut inner = self.inner.lock().await;

            if let Some((generation, fut)) = &inner.in_flight {
                (*generation, fut.clone())
            } else {
                if !force {
                    if let (Some(value), Some(fetched_at)) = (&inner.value, inner.fetched_at) {
                        if fetched_at.elapsed() < self.ttl {
                            return Ok(value.clone());
                        }
                    }
                }

                inner.generation += 1;
                let generation = inner.generation;
                let fut: SharedFetch<T> = fetch()
                    .map(|result| result.map_err(|err| err.kind))
                    .boxed()
                    .shared();
                inner.in_flight = Some((generation, fut.clone()));
                (generation, fut)
            }
        };

        let result = fut.await;

        let mut inner = self.inner.lock().await;
        if matches!(&inner.in_flight, Some((in_flight, _)) if *in_flight == generation) {
            inner.in_flight = None;
        }
        match result {
            Ok(value) => {
                if generation == inner.generation {
                    inner.value = Some(value.clone());
                    inner.fetched_at = Some(Instant::now());
                }
                Ok(value)
            }
            Err(kind) => Err(kind.into()),
        }
    }

    /// Expires the cached value so the next caller refetches. The stale value
    /// remains visible through [Self::cached] until then.
    pub async fn invalidate(&self) {
        self.inner.lock().await.fetched_at = None;
    }

    /// The last fetched value regardless of age.
    pub async fn cached(&self) -> Option<T> {
        self.inner.lock().await.value.clone()
    }

    /// Stores a value as if it had just been fetched. Used to hydrate a slot
    /// from state obtained elsewhere.
    pub async fn prime(&self, value: T) {
        let mut inner = self.inner.lock().await;
        inner.value = Some(value);
        inner.fetched_at = Some(Instant::now());
    }
}

/// The three per-resource slots the client keeps: drive listing, bin listing,
/// storage stats.
#[derive(Clone)]
pub struct Caches {
    pub drive: ResourceCache<Vec<FileItem>>,
    pub bin: ResourceCache<Vec<FileItem>>,
    pub stats: ResourceCache<StorageStats>,
}

impl Default for Caches {
    fn default() -> Self {
        Self {
            drive: ResourceCache::new(FILES_TTL),
            bin: ResourceCache::new(FILES_TTL),
            stats: ResourceCache::new(STATS_TTL),
        }
    }
}

impl Caches {
    pub fn files(&self, location: FileLocation) -> &ResourceCache<Vec<FileItem>> {
        match location {
            FileLocation::Drive => &self.drive,
            FileLocation::Bin => &self.bin,
        }
    }

    /// Finds a file by id in whichever listing last saw it.
    pub async fn find(&self, id: uuid::Uuid) -> Option<FileItem> {
        for cache in [&self.drive, &self.bin] {
            if let Some(files) = cache.cached().await {
                if let Some(file) = files.into_iter().find(|file| file.id == id) {
                    return Some(file);
                }
            }
        }
        None
    }
}
