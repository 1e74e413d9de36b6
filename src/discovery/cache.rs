use std::{collections::HashMap, fmt::Debug, sync::Arc};

use futures::{
    future::{BoxFuture, Shared, WeakShared},
    FutureExt,
};
use lru_time_cache::LruCache;
use parking_lot::Mutex;
use tokio::time::Instant;
use url::Url;

use crate::{
    helpers::discovery_url,
    jwks::Jwks,
    types::{require_non_empty, OidcHttpClient, ValidatorError, ValidatorResult},
};

use super::{fetch::fetch_signing_keys_async, DiscoveryCacheConfig, RefreshPolicy};

type FetchResult = ValidatorResult<Arc<Jwks>>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct CacheKey {
    issuer: String,
    well_known_path: String,
}

#[derive(Debug, Clone)]
struct Snapshot {
    keys: Arc<Jwks>,
    fetched_at: Instant,
    stale: bool,
    retry_after: Option<Instant>,
}

struct State {
    snapshots: LruCache<CacheKey, Snapshot>,
    in_flight: HashMap<CacheKey, WeakShared<BoxFuture<'static, FetchResult>>>,
    generation: u64,
}

struct Inner<H> {
    http_client: H,
    config: DiscoveryCacheConfig,
    state: Mutex<State>,
}

enum Lookup {
    Hit(Arc<Jwks>),
    Wait(SharedFetch),
}

/// # DiscoveryCache
/// Resolves `(issuer, well-known path)` pairs to signing key sets.
///
/// One instance is meant to live for the whole process (see
/// [DiscoveryCache::global]); clones are cheap handles onto the same store.
///
/// - The last successfully fetched key set of every pair is kept and served
///   according to [RefreshPolicy].
/// - Concurrent lookups of a pair that needs fetching share one fetch and its
///   result, success or failure.
/// - A snapshot is replaced as a whole or not at all. If a refresh fails while
///   an older snapshot exists, the older snapshot keeps being served.
/// - Dropping every caller waiting on a fetch drops the fetch.
pub struct DiscoveryCache<H> {
    inner: Arc<Inner<H>>,
}

impl<H> Clone for DiscoveryCache<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H> Debug for DiscoveryCache<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryCache")
            .field("config", &self.inner.config)
            .field("entries", &self.inner.state.lock().snapshots.len())
            .finish()
    }
}

impl<H> DiscoveryCache<H>
where
    H: OidcHttpClient + Send + Sync + 'static,
{
    /// Creates a cache with [DiscoveryCacheConfig::default]
    pub fn new(http_client: H) -> Self {
        Self::with_config(http_client, DiscoveryCacheConfig::default())
    }

    /// Creates a cache with a custom configuration
    pub fn with_config(http_client: H, config: DiscoveryCacheConfig) -> Self {
        let state = State {
            snapshots: LruCache::with_capacity(config.max_entries.max(1)),
            in_flight: HashMap::new(),
            generation: 0,
        };

        Self {
            inner: Arc::new(Inner {
                http_client,
                config,
                state: Mutex::new(state),
            }),
        }
    }

    /// The configuration this cache was built with
    pub fn config(&self) -> &DiscoveryCacheConfig {
        &self.inner.config
    }

    /// # Get Signing Keys
    /// Returns the current key set of `issuer`, fetching the discovery
    /// document at `issuer` + `well_known_path` when the cached snapshot is
    /// missing or due for a refresh.
    ///
    /// - `issuer` - Issuer identifier, also the base of the discovery URL
    /// - `well_known_path` - e.g. `/.well-known/openid-configuration`
    ///
    /// Fails with [ValidatorError::InvalidArgument] for empty arguments or an
    /// unusable URL, and with [ValidatorError::DiscoveryUnavailable] if no key
    /// set could be obtained.
    pub async fn get_signing_keys(
        &self,
        issuer: &str,
        well_known_path: &str,
    ) -> ValidatorResult<Arc<Jwks>> {
        require_non_empty(&[("issuer", issuer), ("well_known_path", well_known_path)])?;

        let url = discovery_url(issuer, well_known_path)?;

        let key = CacheKey {
            issuer: issuer.to_string(),
            well_known_path: well_known_path.to_string(),
        };

        let lookup = {
            let mut state = self.inner.state.lock();
            self.lookup(&mut state, &key, url)
        };

        match lookup {
            Lookup::Hit(keys) => {
                tracing::debug!(issuer, well_known_path, "using cached signing key set");
                Ok(keys)
            }
            Lookup::Wait(fetch) => fetch.await,
        }
    }

    /// # Request Refresh
    /// Marks the cached snapshot for `issuer` + `well_known_path` stale so the
    /// next lookup refetches it. Ignored while the snapshot is younger than
    /// [DiscoveryCacheConfig::min_refresh_interval]. Returns whether the entry
    /// was marked.
    pub fn request_refresh(&self, issuer: &str, well_known_path: &str) -> bool {
        let key = CacheKey {
            issuer: issuer.to_string(),
            well_known_path: well_known_path.to_string(),
        };

        let mut state = self.inner.state.lock();

        let snapshot = match state.snapshots.get_mut(&key) {
            Some(s) => s,
            None => return false,
        };

        if snapshot.fetched_at.elapsed() < self.inner.config.min_refresh_interval {
            tracing::debug!(issuer, well_known_path, "refresh request rate limited");
            return false;
        }

        snapshot.stale = true;
        snapshot.retry_after = None;
        true
    }

    /// Drops every cached entry. Fetches already in flight still complete for
    /// the callers awaiting them, but their results are not stored and later
    /// lookups start new fetches.
    pub fn clear(&self) {
        let mut state = self.inner.state.lock();
        state.snapshots.clear();
        state.in_flight.clear();
        state.generation += 1;
        tracing::debug!("discovery cache cleared");
    }

    /// Number of `(issuer, well-known path)` key sets currently held
    pub fn len(&self) -> usize {
        self.inner.state.lock().snapshots.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, state: &mut State, key: &CacheKey, url: Url) -> Lookup {
        if let Some(snapshot) = state.snapshots.get(key) {
            if self.is_fresh(snapshot) {
                return Lookup::Hit(Arc::clone(&snapshot.keys));
            }
        }

        if let Some(fetch) = state.in_flight.get(key).and_then(WeakShared::upgrade) {
            tracing::debug!(
                issuer = %key.issuer,
                well_known_path = %key.well_known_path,
                "joining in-flight discovery fetch"
            );
            return Lookup::Wait(fetch);
        }

        // Fetches abandoned by every caller leave dead handles behind.
        state.in_flight.retain(|_, fetch| fetch.upgrade().is_some());

        let fetch = Self::refresh(Arc::clone(&self.inner), key.clone(), url, state.generation)
            .boxed()
            .shared();

        if let Some(handle) = fetch.downgrade() {
            state.in_flight.insert(key.clone(), handle);
        }

        Lookup::Wait(fetch)
    }

    fn is_fresh(&self, snapshot: &Snapshot) -> bool {
        if let Some(retry_after) = snapshot.retry_after {
            if Instant::now() < retry_after {
                return true;
            }
        }

        if snapshot.stale {
            return false;
        }

        match self.inner.config.refresh_policy {
            RefreshPolicy::OnMiss => true,
            RefreshPolicy::Ttl(ttl) => snapshot.fetched_at.elapsed() < ttl,
            RefreshPolicy::Always => false,
        }
    }

    async fn refresh(inner: Arc<Inner<H>>, key: CacheKey, url: Url, generation: u64) -> FetchResult {
        let config = &inner.config;

        let fetched = match tokio::time::timeout(
            config.fetch_timeout,
            fetch_signing_keys_async(&url, &key.issuer, config, &inner.http_client),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ValidatorError::discovery_unavailable(format!(
                "fetching {url} timed out after {:?}",
                config.fetch_timeout
            ))),
        };

        let mut state = inner.state.lock();

        if state.generation != generation {
            tracing::debug!(
                issuer = %key.issuer,
                well_known_path = %key.well_known_path,
                "cache cleared during fetch, result not stored"
            );
            return fetched.map(Arc::new);
        }

        state.in_flight.remove(&key);

        match fetched {
            Ok(jwks) => {
                let keys = Arc::new(jwks);
                state.snapshots.insert(
                    key,
                    Snapshot {
                        keys: Arc::clone(&keys),
                        fetched_at: Instant::now(),
                        stale: false,
                        retry_after: None,
                    },
                );
                Ok(keys)
            }
            Err(e) => match state.snapshots.get_mut(&key) {
                Some(previous) => {
                    tracing::warn!(
                        issuer = %key.issuer,
                        well_known_path = %key.well_known_path,
                        error = %e,
                        "refresh failed, serving previous signing key set"
                    );
                    previous.retry_after = Some(Instant::now() + config.min_refresh_interval);
                    Ok(Arc::clone(&previous.keys))
                }
                None => {
                    tracing::error!(
                        issuer = %key.issuer,
                        well_known_path = %key.well_known_path,
                        error = %e,
                        "no signing key set available"
                    );
                    Err(e)
                }
            },
        }
    }
}
