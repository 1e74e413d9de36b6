use std::{fmt::Debug, sync::Arc};

use subtle::ConstantTimeEq;

use crate::{
    discovery::DiscoveryCache,
    helpers::now,
    jwks::{Jwks, SigningKeySetProvider},
    types::{
        require_non_empty, FailureReason, OidcHttpClient, ValidationOutcome, ValidationPolicy,
        ValidatorResult, VerificationError,
    },
};

use super::{JoseVerifier, TokenVerifier};

/// # TokenValidator
/// Decides whether an ID Token is acceptable for one issuer, one audience and
/// one nonce.
///
/// The `validate*` methods return `Ok(false)` for every token that fails a
/// check and reserve `Err` for caller mistakes and, on the discovery path, for
/// an issuer whose keys cannot be obtained at all.
pub struct TokenValidator<H> {
    discovery: DiscoveryCache<H>,
    verifier: Arc<dyn TokenVerifier>,
    now: fn() -> i64,
}

impl<H> Debug for TokenValidator<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("discovery", &self.discovery)
            .finish_non_exhaustive()
    }
}

impl<H> Clone for TokenValidator<H> {
    fn clone(&self) -> Self {
        Self {
            discovery: self.discovery.clone(),
            verifier: Arc::clone(&self.verifier),
            now: self.now,
        }
    }
}

impl<H> TokenValidator<H>
where
    H: OidcHttpClient + Send + Sync + 'static,
{
    /// Creates a validator resolving keys through `discovery` and verifying
    /// with [JoseVerifier]
    pub fn new(discovery: DiscoveryCache<H>) -> Self {
        Self {
            discovery,
            verifier: Arc::new(JoseVerifier),
            now,
        }
    }

    /// Replaces the [TokenVerifier]
    pub fn with_verifier(mut self, verifier: impl TokenVerifier + 'static) -> Self {
        self.verifier = Arc::new(verifier);
        self
    }

    /// Replaces the clock used for lifetime checks. `now` returns Unix
    /// seconds.
    pub fn with_clock(mut self, now: fn() -> i64) -> Self {
        self.now = now;
        self
    }

    /// The discovery cache backing [TokenValidator::validate_async]
    pub fn discovery(&self) -> &DiscoveryCache<H> {
        &self.discovery
    }

    /// # Validate through discovery
    /// Resolves the signing keys of `issuer` through the discovery cache and
    /// validates `token` with lifetime checks enabled.
    ///
    /// - `token` - Compact serialized ID Token
    /// - `issuer` - The only accepted `iss`, also the base of the discovery URL
    /// - `audience` - Value `aud` must contain, usually the client id
    /// - `nonce` - Value the `nonce` claim must equal
    /// - `well_known_path` - Path of the discovery document under `issuer`
    ///
    /// Returns [crate::types::ValidatorError::DiscoveryUnavailable] when no key
    /// set could be obtained for the issuer.
    pub async fn validate_async(
        &self,
        token: &str,
        issuer: &str,
        audience: &str,
        nonce: &str,
        well_known_path: &str,
    ) -> ValidatorResult<bool> {
        require_non_empty(&[
            ("token", token),
            ("issuer", issuer),
            ("audience", audience),
            ("nonce", nonce),
            ("well_known_path", well_known_path),
        ])?;

        let keys = self
            .discovery
            .get_signing_keys(issuer, well_known_path)
            .await?;

        Ok(self
            .verify_with_keys(token, issuer, audience, nonce, keys, true)
            .is_accepted())
    }

    /// # Validate
    /// Validates `token` against the key set produced by `key_source`.
    ///
    /// `check_lifetime` turns `exp` / `nbf` enforcement on or off. See
    /// [TokenValidator::validate_outcome] for the rejection reason.
    pub async fn validate<K>(
        &self,
        token: &str,
        issuer: &str,
        audience: &str,
        nonce: &str,
        key_source: &K,
        check_lifetime: bool,
    ) -> ValidatorResult<bool>
    where
        K: SigningKeySetProvider,
    {
        self.validate_outcome(token, issuer, audience, nonce, key_source, check_lifetime)
            .await
            .map(|o| o.is_accepted())
    }

    /// Same as [TokenValidator::validate] but keeps the [FailureReason] of a
    /// rejection.
    ///
    /// A key source that fails for any reason other than an invalid argument
    /// rejects the token with [FailureReason::KeysUnavailable].
    pub async fn validate_outcome<K>(
        &self,
        token: &str,
        issuer: &str,
        audience: &str,
        nonce: &str,
        key_source: &K,
        check_lifetime: bool,
    ) -> ValidatorResult<ValidationOutcome>
    where
        K: SigningKeySetProvider,
    {
        require_non_empty(&[
            ("token", token),
            ("issuer", issuer),
            ("audience", audience),
            ("nonce", nonce),
        ])?;

        let keys = match key_source.signing_keys().await {
            Ok(keys) => keys,
            Err(e) if e.is_invalid_argument() => return Err(e),
            Err(e) => {
                tracing::warn!(issuer, error = %e, "signing keys unavailable, rejecting token");
                return Ok(ValidationOutcome::rejected(FailureReason::KeysUnavailable));
            }
        };

        Ok(self.verify_with_keys(token, issuer, audience, nonce, keys, check_lifetime))
    }

    /// Validates `token` against an already resolved key set.
    pub fn validate_with_key_set(
        &self,
        token: &str,
        issuer: &str,
        audience: &str,
        nonce: &str,
        keys: Arc<Jwks>,
        check_lifetime: bool,
    ) -> ValidatorResult<ValidationOutcome> {
        require_non_empty(&[
            ("token", token),
            ("issuer", issuer),
            ("audience", audience),
            ("nonce", nonce),
        ])?;

        Ok(self.verify_with_keys(token, issuer, audience, nonce, keys, check_lifetime))
    }

    fn verify_with_keys(
        &self,
        token: &str,
        issuer: &str,
        audience: &str,
        nonce: &str,
        keys: Arc<Jwks>,
        check_lifetime: bool,
    ) -> ValidationOutcome {
        let policy = ValidationPolicy::new(issuer, audience, keys, check_lifetime, (self.now)());

        let verified = match self.verifier.verify(token, &policy) {
            Ok(v) => v,
            Err(e) => {
                let reason = failure_reason(&e);
                tracing::debug!(issuer, audience, %reason, error = %e, "token rejected");
                return ValidationOutcome::rejected(reason);
            }
        };

        if !nonce_matches(verified.nonce(), nonce) {
            tracing::debug!(
                issuer,
                audience,
                reason = %FailureReason::NonceMismatch,
                "token rejected"
            );
            return ValidationOutcome::rejected(FailureReason::NonceMismatch);
        }

        tracing::debug!(issuer, audience, kid = verified.key_id.as_deref(), "token accepted");

        ValidationOutcome::accepted()
    }
}

#[cfg(feature = "http_client")]
impl TokenValidator<crate::http_client::DefaultHttpClient> {
    /// A validator sharing the process-wide [DiscoveryCache::global]
    pub fn from_global() -> ValidatorResult<Self> {
        DiscoveryCache::<crate::http_client::DefaultHttpClient>::global()
            .map(|cache| Self::new(cache.clone()))
    }
}

fn failure_reason(error: &VerificationError) -> FailureReason {
    match error {
        VerificationError::Expired(_) => FailureReason::TokenExpired,
        VerificationError::NotYetValid(_) => FailureReason::TokenNotYetValid,
        VerificationError::InvalidIssuer(_) => FailureReason::IssuerMismatch,
        VerificationError::InvalidAudience(_) => FailureReason::AudienceMismatch,
        VerificationError::InvalidSignature(_) => FailureReason::SignatureInvalid,
        VerificationError::Malformed(_) | VerificationError::InvalidArgument(_) => {
            FailureReason::MalformedToken
        }
        VerificationError::Other(e) => {
            tracing::warn!(error = %e, "unclassified verifier failure");
            FailureReason::VerifierFailure
        }
    }
}

fn nonce_matches(actual: Option<&str>, expected: &str) -> bool {
    match actual {
        Some(actual) => actual.as_bytes().ct_eq(expected.as_bytes()).into(),
        None => false,
    }
}
