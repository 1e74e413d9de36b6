use std::{future::Future, sync::Arc};

use crate::types::ValidatorResult;

use super::Jwks;

/// Source of the signing key set a token is verified against.
///
/// The validator only depends on this capability. Production wiring hands it a
/// [crate::discovery::DiscoverySource]; tests and pinned-key deployments hand
/// it a fixed [Jwks].
pub trait SigningKeySetProvider {
    /// Resolves the current key set snapshot
    fn signing_keys(&self) -> impl Future<Output = ValidatorResult<Arc<Jwks>>> + Send;
}

impl SigningKeySetProvider for Jwks {
    async fn signing_keys(&self) -> ValidatorResult<Arc<Jwks>> {
        Ok(Arc::new(self.clone()))
    }
}

impl SigningKeySetProvider for Arc<Jwks> {
    async fn signing_keys(&self) -> ValidatorResult<Arc<Jwks>> {
        Ok(Arc::clone(self))
    }
}
