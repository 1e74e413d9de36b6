use josekit::jwt::{decode_with_verifier, JwtPayload};
use serde_json::Value;

use crate::{
    helpers::decode_jwt,
    jwks::jwks::CustomJwk,
    types::{ValidationPolicy, VerificationError, VerifiedPayload},
};

/// Cryptographic and claims verification of a token against a
/// [ValidationPolicy].
///
/// Implementations must confirm that the signature verifies against at least
/// one key of the policy's key set, that `iss` is the trusted issuer, that
/// `aud` contains the trusted audience and, when lifetime validation is on,
/// that `nbf` / `exp` hold within the clock skew. Each failure is reported as
/// the [VerificationError] variant naming the check.
pub trait TokenVerifier: Send + Sync {
    /// Verifies `token` and returns its verified header and claims
    fn verify(
        &self,
        token: &str,
        policy: &ValidationPolicy,
    ) -> Result<VerifiedPayload, VerificationError>;
}

/// The default [TokenVerifier], backed by [josekit].
///
/// Checks run in this order: structure, signature, lifetime, audience,
/// issuer. Symmetric (`HS*`) and unsecured (`none`) algorithms are never
/// accepted.
#[derive(Debug, Default, Clone, Copy)]
pub struct JoseVerifier;

impl TokenVerifier for JoseVerifier {
    fn verify(
        &self,
        token: &str,
        policy: &ValidationPolicy,
    ) -> Result<VerifiedPayload, VerificationError> {
        let decoded = decode_jwt(token)?;

        let alg = decoded
            .algorithm()
            .ok_or_else(|| VerificationError::Malformed("alg not found in jwt header".to_string()))?;

        if alg == "none" || alg.starts_with("HS") {
            return Err(VerificationError::InvalidSignature(format!(
                "{alg} is not an accepted signing algorithm"
            )));
        }

        let candidates = policy.signing_keys().candidates(alg, decoded.key_id());

        if candidates.is_empty() {
            return Err(VerificationError::InvalidSignature(format!(
                "no key in the key set matches kid: {}, alg: {alg}",
                decoded.key_id().unwrap_or_default()
            )));
        }

        let mut verified = None;

        for key in candidates {
            let verifier = match key.to_verifier(alg) {
                Ok(v) => v,
                Err(e) => {
                    tracing::debug!(kid = key.key_id(), error = %e, "skipping unusable key");
                    continue;
                }
            };

            if let Ok((payload, header)) = decode_with_verifier(token, &*verifier) {
                verified = Some(VerifiedPayload {
                    payload,
                    header,
                    key_id: key.key_id().map(|k| k.to_string()),
                });
                break;
            }
        }

        let verified = verified.ok_or_else(|| {
            VerificationError::InvalidSignature("failed to validate JWT signature".to_string())
        })?;

        if policy.validate_lifetime() {
            validate_lifetime(&verified.payload, policy)?;
        }

        validate_audience(&verified.payload, policy.audience())?;
        validate_issuer(&verified.payload, policy.issuer())?;

        Ok(verified)
    }
}

fn numeric_claim(payload: &JwtPayload, name: &str) -> Result<Option<i64>, VerificationError> {
    match payload.claim(name) {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| {
                VerificationError::Malformed(format!("JWT {name} claim is out of range"))
            }),
        Some(_) => Err(VerificationError::Malformed(format!(
            "JWT {name} claim must be a JSON numeric value"
        ))),
    }
}

fn validate_lifetime(payload: &JwtPayload, policy: &ValidationPolicy) -> Result<(), VerificationError> {
    let now = policy.timestamp();
    let skew = policy.clock_skew().as_secs() as i64;

    let exp = numeric_claim(payload, "exp")?
        .ok_or_else(|| VerificationError::Malformed("missing required JWT property exp".to_string()))?;
    let nbf = numeric_claim(payload, "nbf")?;

    if let Some(nbf) = nbf {
        if nbf > exp {
            return Err(VerificationError::Malformed(format!(
                "JWT nbf {nbf} is after exp {exp}"
            )));
        }

        if nbf > now.saturating_add(skew) {
            return Err(VerificationError::NotYetValid(format!(
                "JWT not active yet, now {now}, nbf {nbf}"
            )));
        }
    }

    if exp < now.saturating_sub(skew) {
        return Err(VerificationError::Expired(format!(
            "JWT expired, now {now}, exp {exp}"
        )));
    }

    Ok(())
}

fn validate_audience(payload: &JwtPayload, audience: &str) -> Result<(), VerificationError> {
    match payload.audience() {
        Some(aud) if aud.contains(&audience) => Ok(()),
        Some(aud) => Err(VerificationError::InvalidAudience(format!(
            "aud mismatch, expected {audience}, got: {aud:?}"
        ))),
        None => Err(VerificationError::InvalidAudience(
            "missing required JWT property aud".to_string(),
        )),
    }
}

fn validate_issuer(payload: &JwtPayload, issuer: &str) -> Result<(), VerificationError> {
    match payload.issuer() {
        Some(iss) if iss == issuer => Ok(()),
        Some(iss) => Err(VerificationError::InvalidIssuer(format!(
            "unexpected iss value, expected {issuer}, got: {iss}"
        ))),
        None => Err(VerificationError::InvalidIssuer(
            "missing required JWT property iss".to_string(),
        )),
    }
}
