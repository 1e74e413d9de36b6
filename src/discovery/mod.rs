//! # Discovery
//! Process-wide cache of issuer signing key sets, fetched through
//! `.well-known/openid-configuration` documents.

mod cache;
mod config;
mod fetch;
mod source;

pub use cache::DiscoveryCache;
pub use config::{DiscoveryCacheConfig, RefreshPolicy};
pub use source::DiscoverySource;

/// The well-known path OpenID Providers publish their discovery document at
pub const OPENID_CONFIGURATION_PATH: &str = "/.well-known/openid-configuration";

#[cfg(feature = "http_client")]
mod global {
    use lazy_static::lazy_static;

    use crate::{
        http_client::DefaultHttpClient,
        types::{ValidatorError, ValidatorResult},
    };

    use super::DiscoveryCache;

    lazy_static! {
        static ref GLOBAL_CACHE: Result<DiscoveryCache<DefaultHttpClient>, String> =
            DefaultHttpClient::new().map(DiscoveryCache::new);
    }

    impl DiscoveryCache<DefaultHttpClient> {
        /// # Global cache
        /// The process-wide cache backed by [DefaultHttpClient], created on
        /// first use with the default configuration.
        pub fn global() -> ValidatorResult<&'static DiscoveryCache<DefaultHttpClient>> {
            GLOBAL_CACHE.as_ref().map_err(|e| {
                ValidatorError::discovery_unavailable(format!("could not build http client: {e}"))
            })
        }
    }
}
