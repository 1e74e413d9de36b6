use josekit::{
    jwk::Jwk,
    jws::{
        alg::{
            ecdsa::EcdsaJwsAlgorithm, eddsa::EddsaJwsAlgorithm, rsassa::RsassaJwsAlgorithm,
            rsassa_pss::RsassaPssJwsAlgorithm,
        },
        JwsVerifier,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(crate) trait CustomJwk {
    fn is_private_key(&self) -> bool;

    fn is_signing_key(&self) -> bool;

    fn supports_alg(&self, alg: &str) -> bool;

    fn to_verifier(&self, alg: &str) -> Result<Box<dyn JwsVerifier>, String>;
}

impl CustomJwk for Jwk {
    fn is_private_key(&self) -> bool {
        self.key_type() == "oct" || self.parameter("d").is_some()
    }

    fn is_signing_key(&self) -> bool {
        self.key_use().map_or(true, |u| u == "sig")
    }

    fn supports_alg(&self, alg: &str) -> bool {
        if get_kty_from_alg(alg) != Some(self.key_type()) {
            return false;
        }

        match self.algorithm() {
            Some(key_alg) => key_alg == alg,
            None => true,
        }
    }

    fn to_verifier(&self, alg: &str) -> Result<Box<dyn JwsVerifier>, String> {
        let error = |e: josekit::JoseError| format!("error when creating a jws verifier: {e}");

        // Key selection by kid happens in Jwks::candidates.
        let mut map: Map<String, Value> = match serde_json::to_value(self) {
            Ok(Value::Object(m)) => m,
            _ => return Err("jwk could not be serialized to a json object".to_string()),
        };
        map.remove("kid");
        let key = Jwk::from_map(map).map_err(error)?;
        let key = &key;

        let verifier: Box<dyn JwsVerifier> = match alg {
            "RS256" => Box::new(RsassaJwsAlgorithm::Rs256.verifier_from_jwk(key).map_err(error)?),
            "RS384" => Box::new(RsassaJwsAlgorithm::Rs384.verifier_from_jwk(key).map_err(error)?),
            "RS512" => Box::new(RsassaJwsAlgorithm::Rs512.verifier_from_jwk(key).map_err(error)?),
            "PS256" => Box::new(
                RsassaPssJwsAlgorithm::Ps256
                    .verifier_from_jwk(key)
                    .map_err(error)?,
            ),
            "PS384" => Box::new(
                RsassaPssJwsAlgorithm::Ps384
                    .verifier_from_jwk(key)
                    .map_err(error)?,
            ),
            "PS512" => Box::new(
                RsassaPssJwsAlgorithm::Ps512
                    .verifier_from_jwk(key)
                    .map_err(error)?,
            ),
            "ES256" => Box::new(EcdsaJwsAlgorithm::Es256.verifier_from_jwk(key).map_err(error)?),
            "ES384" => Box::new(EcdsaJwsAlgorithm::Es384.verifier_from_jwk(key).map_err(error)?),
            "ES512" => Box::new(EcdsaJwsAlgorithm::Es512.verifier_from_jwk(key).map_err(error)?),
            "ES256K" => Box::new(
                EcdsaJwsAlgorithm::Es256k
                    .verifier_from_jwk(key)
                    .map_err(error)?,
            ),
            "EdDSA" => Box::new(EddsaJwsAlgorithm::Eddsa.verifier_from_jwk(key).map_err(error)?),
            other => return Err(format!("unsupported signing algorithm {other}")),
        };

        Ok(verifier)
    }
}

/// # Jwks
/// An ordered, immutable set of public signing keys, as published by an
/// issuer's `jwks_uri`. This is the signing key set every validation runs
/// against.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Jwks {
    keys: Vec<Jwk>,
}

impl From<Vec<Jwk>> for Jwks {
    fn from(value: Vec<Jwk>) -> Self {
        Self { keys: value }
    }
}

#[derive(Deserialize)]
struct RawJwks {
    keys: Vec<Value>,
}

impl Jwks {
    /// Parses a JWK Set document.
    ///
    /// The document itself must be a JSON object with a `keys` array. Entries
    /// that are not valid JWKs, are meant for encryption, or carry private key
    /// material are skipped.
    pub fn from_json(body: &str) -> Result<Self, String> {
        let raw: RawJwks =
            serde_json::from_str(body).map_err(|e| format!("invalid jwks document: {e}"))?;

        let mut keys = Vec::with_capacity(raw.keys.len());

        for (index, value) in raw.keys.into_iter().enumerate() {
            let map: Map<String, Value> = match value {
                Value::Object(m) => m,
                _ => {
                    tracing::warn!(index, "skipping jwks entry that is not an object");
                    continue;
                }
            };

            let jwk = match Jwk::from_map(map) {
                Ok(j) => j,
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping unresolvable jwk");
                    continue;
                }
            };

            if !jwk.is_signing_key() {
                tracing::debug!(index, kid = jwk.key_id(), "skipping non-signing jwk");
                continue;
            }

            if jwk.is_private_key() {
                tracing::warn!(index, kid = jwk.key_id(), "skipping jwk with private material");
                continue;
            }

            keys.push(jwk);
        }

        Ok(Self { keys })
    }

    /// Number of keys present in [Jwks]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns if [Jwks] is empty or not
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in publication order
    pub fn keys(&self) -> &[Jwk] {
        &self.keys
    }

    /// Keys that may verify a token signed with `alg`.
    ///
    /// When `kid` is given and at least one compatible key carries it, only
    /// those keys are returned. Otherwise every compatible key is returned so
    /// that tokens without a (known) `kid` still get a chance to verify.
    pub(crate) fn candidates(&self, alg: &str, kid: Option<&str>) -> Vec<&Jwk> {
        let compatible: Vec<&Jwk> = self
            .keys
            .iter()
            .filter(|key| key.is_signing_key() && key.supports_alg(alg))
            .collect();

        if let Some(kid) = kid {
            let matching: Vec<&Jwk> = compatible
                .iter()
                .copied()
                .filter(|key| key.key_id() == Some(kid))
                .collect();

            if !matching.is_empty() {
                return matching;
            }
        }

        compatible
    }
}

fn get_kty_from_alg(alg: &str) -> Option<&'static str> {
    match alg.get(0..2) {
        Some("RS") | Some("PS") => Some("RSA"),
        Some("ES") => Some("EC"),
        Some("Ed") => Some("OKP"),
        _ => None,
    }
}
