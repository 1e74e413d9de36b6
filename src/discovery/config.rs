use std::time::Duration;

/// When a cached key set is considered too old to serve without refetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Fetch once, then serve the snapshot until a refresh is requested
    OnMiss,
    /// Refetch once the snapshot is older than the given duration
    Ttl(Duration),
    /// Refetch on every lookup. Concurrent lookups still share one fetch.
    Always,
}

/// # DiscoveryCacheConfig
/// Tuning for [super::DiscoveryCache].
#[derive(Debug, Clone)]
pub struct DiscoveryCacheConfig {
    /// Refresh policy applied to every cached entry. Default: 12 hour TTL
    pub refresh_policy: RefreshPolicy,
    /// Upper bound on one discovery + key set retrieval. Default: 10 seconds
    pub fetch_timeout: Duration,
    /// Minimum age before [super::DiscoveryCache::request_refresh] may mark an
    /// entry stale, and the back-off after a failed refresh. Default: 5 minutes
    pub min_refresh_interval: Duration,
    /// Number of `(issuer, well-known path)` entries kept. Default: 100
    pub max_entries: usize,
    /// Reject discovery documents whose `issuer` differs from the issuer they
    /// were fetched for. Default: true
    pub require_issuer_match: bool,
}

impl Default for DiscoveryCacheConfig {
    fn default() -> Self {
        Self {
            refresh_policy: RefreshPolicy::Ttl(Duration::from_secs(12 * 60 * 60)),
            fetch_timeout: Duration::from_secs(10),
            min_refresh_interval: Duration::from_secs(5 * 60),
            max_entries: 100,
            require_issuer_match: true,
        }
    }
}

impl DiscoveryCacheConfig {
    /// Sets [DiscoveryCacheConfig::refresh_policy]
    pub fn refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    /// Sets [DiscoveryCacheConfig::fetch_timeout]
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Sets [DiscoveryCacheConfig::min_refresh_interval]
    pub fn min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// Sets [DiscoveryCacheConfig::max_entries]
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Sets [DiscoveryCacheConfig::require_issuer_match]
    pub fn require_issuer_match(mut self, require: bool) -> Self {
        self.require_issuer_match = require;
        self
    }
}
