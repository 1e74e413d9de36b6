use std::sync::Arc;

use crate::{
    jwks::{Jwks, SigningKeySetProvider},
    types::{OidcHttpClient, ValidatorResult},
};

use super::DiscoveryCache;

/// A [SigningKeySetProvider] that resolves one issuer's key set through a
/// [DiscoveryCache].
#[derive(Debug)]
pub struct DiscoverySource<'a, H> {
    cache: &'a DiscoveryCache<H>,
    issuer: &'a str,
    well_known_path: &'a str,
}

impl<'a, H> DiscoverySource<'a, H> {
    /// Binds `issuer` and `well_known_path` to `cache`
    pub fn new(cache: &'a DiscoveryCache<H>, issuer: &'a str, well_known_path: &'a str) -> Self {
        Self {
            cache,
            issuer,
            well_known_path,
        }
    }
}

impl<H> SigningKeySetProvider for DiscoverySource<'_, H>
where
    H: OidcHttpClient + Send + Sync + 'static,
{
    async fn signing_keys(&self) -> ValidatorResult<Arc<Jwks>> {
        self.cache
            .get_signing_keys(self.issuer, self.well_known_path)
            .await
    }
}
