#![warn(missing_docs)]
//! # OIDC Token Validator
//!
//! Validates OpenID Connect ID Tokens issued by a single trusted issuer for a
//! single audience and a single nonce. A token is accepted only if its
//! signature verifies against the issuer's published signing keys, its `iss`
//! and `aud` match, its `nonce` matches and (optionally) its `exp` / `nbf`
//! hold within a five minute clock skew.
//!
//! Rejections are reported as `Ok(false)`. Errors are reserved for caller
//! mistakes ([types::ValidatorError::InvalidArgument]) and, on the discovery
//! path, for issuers whose keys cannot be obtained
//! ([types::ValidatorError::DiscoveryUnavailable]).
//!
//! ## Validator API
//!
//! ### New Instance
//! - [validator::TokenValidator::new]
//! - [validator::TokenValidator::from_global]
//!
//! ### Validation
//! - [validator::TokenValidator::validate_async]
//! - [validator::TokenValidator::validate]
//! - [validator::TokenValidator::validate_outcome]
//! - [validator::TokenValidator::validate_with_key_set]
//!
//! ## Discovery Cache
//!
//! ### New Instance
//! - [discovery::DiscoveryCache::new]
//! - [discovery::DiscoveryCache::with_config]
//! - [discovery::DiscoveryCache::global]
//!
//! ### Instance methods
//! - [discovery::DiscoveryCache::get_signing_keys]
//! - [discovery::DiscoveryCache::request_refresh]
//! - [discovery::DiscoveryCache::clear]
//!
//! ## Helpers
//! - [helpers::generate_nonce]
//! - [helpers::decode_jwt]

pub mod discovery;
/// Helpers for callers of this crate
pub mod helpers;
mod http;
#[cfg(feature = "http_client")]
/// The reqwest backed [types::OidcHttpClient]
pub mod http_client;
pub mod jwks;
mod tests;
pub mod types;
pub mod validator;

/// Re exports from the crate
pub mod re_exports {
    pub use josekit::{self};
    pub use serde_json::{self, json, Value};
    pub use url;
}
