use std::collections::HashMap;

use serde::Deserialize;

/// # DiscoveryDocument
/// The parts of an OpenID Provider's `.well-known/openid-configuration` this
/// crate reads. [OIDC Discovery](https://openid.net/specs/openid-connect-discovery-1_0.html#ProviderMetadata).
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DiscoveryDocument {
    /// Issuer identifier the provider asserts for itself
    pub issuer: String,
    /// URL of the provider's JWK Set. [See](https://www.rfc-editor.org/rfc/rfc8414.html#section-2)
    pub jwks_uri: Option<String>,
    /// Any extra data that was read from the discovery document
    #[serde(flatten)]
    pub other_fields: HashMap<String, serde_json::Value>,
}
