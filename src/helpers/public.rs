use std::time::{SystemTime, UNIX_EPOCH};

use josekit::{jws::JwsHeader, jwt::JwtPayload};
use rand::Rng;
use serde_json::{Map, Value};

use crate::types::{DecodedToken, VerificationError};

/// Current Unix time in seconds, read from [SystemTime::now].
/// This is the default clock of [crate::validator::TokenValidator].
pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Base64url encoded random bytes from [rand::thread_rng]. 32 bytes unless
/// `bytes` says otherwise.
pub fn generate_random(bytes: Option<u32>) -> String {
    let mut random_bytes = vec![0u8; bytes.unwrap_or(32) as usize];
    rand::thread_rng().fill(random_bytes.as_mut_slice());
    base64_url::encode(&random_bytes)
}

/// A fresh value for the `nonce` authorization parameter.
///
/// Keep it with the login session and pass it to
/// [crate::validator::TokenValidator::validate] once the ID Token comes back.
pub fn generate_nonce(bytes: Option<u32>) -> String {
    generate_random(bytes)
}

/// Splits a compact JWS into header, claims and signature. Nothing is
/// verified; see [crate::validator::JoseVerifier] for that.
pub fn decode_jwt(token: &str) -> Result<DecodedToken, VerificationError> {
    let parts: Vec<&str> = token.split('.').collect();

    if parts.len() == 5 {
        return Err(VerificationError::Malformed(
            "encrypted JWTs cannot be decoded".to_string(),
        ));
    }

    if parts.len() != 3 {
        return Err(VerificationError::Malformed(
            "JWTs must have three components".to_string(),
        ));
    }

    let malformed = |_| VerificationError::Malformed("JWT is malformed".to_string());

    let header_str = base64_url::decode(parts[0]).map_err(malformed)?;
    let payload_str = base64_url::decode(parts[1]).map_err(malformed)?;
    let signature = parts[2].to_string();

    let header = serde_json::from_slice::<Map<String, Value>>(&header_str)
        .map_err(|_| VerificationError::Malformed("JWT header is not a JSON object".to_string()))
        .and_then(|map| {
            JwsHeader::from_map(map)
                .map_err(|_| VerificationError::Malformed("JWT header is invalid".to_string()))
        })?;

    let payload = serde_json::from_slice::<Map<String, Value>>(&payload_str)
        .map_err(|_| VerificationError::Malformed("JWT payload is not a JSON object".to_string()))
        .and_then(|map| {
            JwtPayload::from_map(map)
                .map_err(|_| VerificationError::Malformed("JWT payload is invalid".to_string()))
        })?;

    Ok(DecodedToken {
        header,
        payload,
        signature,
    })
}
