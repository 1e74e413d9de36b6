//! # Signing key sets
//! [Jwks] snapshots and the [SigningKeySetProvider] seam the validator resolves them through.

#[allow(clippy::module_inception)]
pub(crate) mod jwks;
mod provider;

pub use jwks::Jwks;
pub use provider::SigningKeySetProvider;
