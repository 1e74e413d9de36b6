use std::{fmt, sync::Arc, time::Duration};

use josekit::{jws::JwsHeader, jwt::JwtPayload};
use serde_json::Value;

use crate::jwks::Jwks;

/// Tolerance applied when comparing `exp` and `nbf` to the current time.
pub const CLOCK_SKEW: Duration = Duration::from_secs(5 * 60);

/// # ValidationPolicy
/// The checks a [crate::validator::TokenVerifier] must run for one validation
/// call. Built fresh for every call and never shared between calls.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    pub(crate) issuer: String,
    pub(crate) audience: String,
    pub(crate) signing_keys: Arc<Jwks>,
    pub(crate) validate_lifetime: bool,
    pub(crate) clock_skew: Duration,
    pub(crate) timestamp: i64,
}

impl ValidationPolicy {
    /// Creates a policy trusting exactly one issuer and one audience, with the
    /// fixed [CLOCK_SKEW]. `timestamp` is "now" in Unix seconds.
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        signing_keys: Arc<Jwks>,
        validate_lifetime: bool,
        timestamp: i64,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            signing_keys,
            validate_lifetime,
            clock_skew: CLOCK_SKEW,
            timestamp,
        }
    }

    /// The only issuer the token's `iss` may equal
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// The audience the token's `aud` must contain
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Candidate verification keys
    pub fn signing_keys(&self) -> &Jwks {
        &self.signing_keys
    }

    /// Whether `exp` / `nbf` are enforced
    pub fn validate_lifetime(&self) -> bool {
        self.validate_lifetime
    }

    /// Tolerance for `exp` / `nbf`
    pub fn clock_skew(&self) -> Duration {
        self.clock_skew
    }

    /// Unix timestamp the lifetime checks are evaluated at
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// # VerifiedPayload
/// Header and claims of a token whose signature, issuer, audience and
/// (optionally) lifetime have been verified.
#[derive(Debug, Clone)]
pub struct VerifiedPayload {
    /// Verified claims
    pub payload: JwtPayload,
    /// Verified header
    pub header: JwsHeader,
    /// `kid` of the key that verified the signature, if it had one
    pub key_id: Option<String>,
}

impl VerifiedPayload {
    /// Returns the `nonce` claim if present and a JSON string.
    pub fn nonce(&self) -> Option<&str> {
        match self.payload.claim("nonce") {
            Some(Value::String(n)) => Some(n.as_str()),
            _ => None,
        }
    }
}

/// Why a token was rejected. Diagnostic only: callers of the public
/// `validate` entry points only ever see `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The key source could not produce a key set
    KeysUnavailable,
    /// No key verified the signature, or the algorithm is not acceptable
    SignatureInvalid,
    /// `exp` is in the past beyond the clock skew
    TokenExpired,
    /// `nbf` is in the future beyond the clock skew
    TokenNotYetValid,
    /// `iss` is not the trusted issuer
    IssuerMismatch,
    /// `aud` does not contain the trusted audience
    AudienceMismatch,
    /// The token is not a well formed signed JWT
    MalformedToken,
    /// The verified token's `nonce` is missing or differs
    NonceMismatch,
    /// The verifier failed in a way it could not classify
    VerifierFailure,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureReason::KeysUnavailable => "keys_unavailable",
            FailureReason::SignatureInvalid => "signature_invalid",
            FailureReason::TokenExpired => "token_expired",
            FailureReason::TokenNotYetValid => "token_not_yet_valid",
            FailureReason::IssuerMismatch => "issuer_mismatch",
            FailureReason::AudienceMismatch => "audience_mismatch",
            FailureReason::MalformedToken => "malformed_token",
            FailureReason::NonceMismatch => "nonce_mismatch",
            FailureReason::VerifierFailure => "verifier_failure",
        };
        f.write_str(s)
    }
}

/// # ValidationOutcome
/// Accept / reject decision with the classified reason for a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOutcome {
    accepted: bool,
    reason: Option<FailureReason>,
}

impl ValidationOutcome {
    pub(crate) fn accepted() -> Self {
        Self {
            accepted: true,
            reason: None,
        }
    }

    pub(crate) fn rejected(reason: FailureReason) -> Self {
        Self {
            accepted: false,
            reason: Some(reason),
        }
    }

    /// True only when every check passed
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Why the token was rejected. `None` when accepted.
    pub fn reason(&self) -> Option<FailureReason> {
        self.reason
    }
}
