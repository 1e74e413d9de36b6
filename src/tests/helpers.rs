use josekit::{jwk::Jwk, jws::JwsHeader, jwt::JwtPayload};
use serde_json::{json, Value};

use crate::{helpers::now, jwks::Jwks};

use super::test_http_client::{TestHttpClient, TestHttpReqRes};

pub static ISSUER: &str = "https://op.example.com";
pub static AUDIENCE: &str = "identifier";
pub static NONCE: &str = "nonce-3b2fe1";
pub static WELL_KNOWN: &str = "/.well-known/openid-configuration";
pub static DISCOVERY_URL: &str = "https://op.example.com/.well-known/openid-configuration";
pub static JWKS_URI: &str = "https://op.example.com/certs";

pub fn rsa_key(kid: &str) -> Jwk {
    let mut jwk = Jwk::generate_rsa_key(2048).unwrap();
    jwk.set_key_id(kid);
    jwk.set_algorithm("RS256");
    jwk.set_key_use("sig");
    jwk
}

pub fn ec_key(kid: &str) -> Jwk {
    let mut jwk = Jwk::generate_ec_key(josekit::jwk::alg::ec::EcCurve::P256).unwrap();
    jwk.set_key_id(kid);
    jwk.set_algorithm("ES256");
    jwk
}

/// Public half of `key`, keeping the `kid`, `alg` and `use` that
/// [Jwk::to_public_key] drops
pub fn public_key(key: &Jwk) -> Jwk {
    let mut public = key.to_public_key().unwrap();

    if let Some(kid) = key.key_id() {
        public.set_key_id(kid);
    }

    if let Some(alg) = key.algorithm() {
        public.set_algorithm(alg);
    }

    if let Some(key_use) = key.key_use() {
        public.set_key_use(key_use);
    }

    public
}

pub fn public_jwks(keys: &[&Jwk]) -> Jwks {
    Jwks::from(keys.iter().map(|k| public_key(k)).collect::<Vec<Jwk>>())
}

pub fn jwks_json(keys: &[&Jwk]) -> String {
    serde_json::to_string(&public_jwks(keys)).unwrap()
}

pub fn discovery_json(issuer: &str, jwks_uri: &str) -> String {
    json!({
        "issuer": issuer,
        "jwks_uri": jwks_uri,
        "authorization_endpoint": format!("{issuer}/auth"),
        "id_token_signing_alg_values_supported": ["RS256"],
    })
    .to_string()
}

/// Scripts one discovery document fetch followed by one key set fetch
pub fn push_discovery(http_client: &TestHttpClient, keys: &[&Jwk]) {
    http_client.push(discovery_req_res(ISSUER));
    http_client.push(jwks_req_res(keys));
}

pub fn discovery_req_res(issuer: &str) -> TestHttpReqRes {
    TestHttpReqRes::new(DISCOVERY_URL)
        .assert_request_header("accept", vec!["application/json".to_string()])
        .set_response_body(discovery_json(issuer, JWKS_URI))
}

pub fn jwks_req_res(keys: &[&Jwk]) -> TestHttpReqRes {
    TestHttpReqRes::new(JWKS_URI)
        .assert_request_header(
            "accept",
            vec!["application/json,application/jwk-set+json".to_string()],
        )
        .set_response_body(jwks_json(keys))
}

/// Claims of a token that passes every check against [ISSUER], [AUDIENCE]
/// and [NONCE]
pub fn default_claims() -> Vec<(&'static str, Value)> {
    let iat = now();
    vec![
        ("iss", json!(ISSUER)),
        ("sub", json!("userId")),
        ("aud", json!(AUDIENCE)),
        ("nonce", json!(NONCE)),
        ("iat", json!(iat)),
        ("exp", json!(iat + 3600)),
    ]
}

pub fn claims_with(overrides: Vec<(&'static str, Option<Value>)>) -> Vec<(&'static str, Value)> {
    let mut claims = default_claims();

    for (name, value) in overrides {
        claims.retain(|(c, _)| *c != name);
        if let Some(v) = value {
            claims.push((name, v));
        }
    }

    claims
}

pub fn get_id_token(key: &Jwk, alg: &str, claims: Vec<(&str, Value)>) -> String {
    let mut p = JwtPayload::new();

    for (c, v) in claims {
        p.set_claim(c, Some(v)).unwrap();
    }

    let mut header = JwsHeader::new();
    header.set_claim("alg", Some(json!(alg))).unwrap();
    header.set_token_type("JWT");

    if let Some(id) = key.key_id() {
        header.set_key_id(id);
    }

    let signer: Box<dyn josekit::jws::JwsSigner> = match alg {
        "RS256" => Box::new(josekit::jws::RS256.signer_from_jwk(key).unwrap()),
        "ES256" => Box::new(josekit::jws::ES256.signer_from_jwk(key).unwrap()),
        other => panic!("no signer for {other}"),
    };

    josekit::jwt::encode_with_signer(&p, &header, &*signer).unwrap()
}

/// Same as [get_id_token] but without a `kid` header
pub fn get_id_token_without_kid(key: &Jwk, claims: Vec<(&str, Value)>) -> String {
    let mut p = JwtPayload::new();

    for (c, v) in claims {
        p.set_claim(c, Some(v)).unwrap();
    }

    let mut header = JwsHeader::new();
    header.set_token_type("JWT");

    let key = without_key_id(key);

    let signer = josekit::jws::RS256.signer_from_jwk(&key).unwrap();

    josekit::jwt::encode_with_signer(&p, &header, &signer).unwrap()
}

pub fn without_key_id(key: &Jwk) -> Jwk {
    let mut map = match serde_json::to_value(key).unwrap() {
        Value::Object(m) => m,
        _ => unreachable!(),
    };
    map.remove("kid");
    Jwk::from_map(map).unwrap()
}

/// Builds an unsigned token by hand: `alg` is written as given
pub fn unsecured_token(alg: &str, claims: Vec<(&str, Value)>) -> String {
    let header = json!({ "alg": alg, "typ": "JWT" }).to_string();
    let payload = Value::Object(
        claims
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
    .to_string();

    format!(
        "{}.{}.",
        base64_url::encode(header.as_bytes()),
        base64_url::encode(payload.as_bytes())
    )
}
