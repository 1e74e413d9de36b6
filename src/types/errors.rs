use thiserror::Error;

/// # ValidatorError
/// Error that is returned to the caller of this library.
///
/// Token content never produces one of these. A forged, expired or mismatched
/// token yields `Ok(false)`; only caller bugs and unreachable discovery
/// documents surface as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorError {
    /// A required parameter was empty or otherwise unusable
    #[error("invalid argument `{name}`: {message}")]
    InvalidArgument {
        /// Name of the offending parameter
        name: String,
        /// What was wrong with it
        message: String,
    },
    /// The discovery document or the key set it references could not be
    /// retrieved or parsed
    #[error("discovery unavailable: {0}")]
    DiscoveryUnavailable(String),
}

impl ValidatorError {
    /// Creates a [ValidatorError::InvalidArgument] for an empty parameter
    pub fn invalid_argument(name: &str) -> Self {
        Self::InvalidArgument {
            name: name.to_string(),
            message: "must be a non-empty string".to_string(),
        }
    }

    /// Creates a [ValidatorError::InvalidArgument] with a custom message
    pub fn invalid_argument_with(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.to_string(),
            message: message.into(),
        }
    }

    /// Creates a [ValidatorError::DiscoveryUnavailable]
    pub fn discovery_unavailable(message: impl Into<String>) -> Self {
        Self::DiscoveryUnavailable(message.into())
    }

    /// Returns true if this error is an [ValidatorError::InvalidArgument]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// Result type used throughout the crate
pub type ValidatorResult<T> = Result<T, ValidatorError>;

/// Checks that every `(name, value)` pair carries a non-empty value.
pub(crate) fn require_non_empty(params: &[(&str, &str)]) -> ValidatorResult<()> {
    for (name, value) in params {
        if value.is_empty() {
            return Err(ValidatorError::invalid_argument(name));
        }
    }
    Ok(())
}

/// # VerificationError
/// Structured failure reported by a [crate::validator::TokenVerifier]. Each
/// variant names the check that rejected the token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// `exp` (plus clock skew) is in the past
    #[error("token expired: {0}")]
    Expired(String),
    /// `nbf` (minus clock skew) is in the future
    #[error("token not yet valid: {0}")]
    NotYetValid(String),
    /// `iss` is missing or not the trusted issuer
    #[error("invalid issuer: {0}")]
    InvalidIssuer(String),
    /// `aud` is missing or does not contain the trusted audience
    #[error("invalid audience: {0}")]
    InvalidAudience(String),
    /// No key in the key set verifies the signature
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
    /// The token is not a well formed signed JWT
    #[error("malformed token: {0}")]
    Malformed(String),
    /// The verifier was handed an unusable policy or token
    #[error("invalid verification argument: {0}")]
    InvalidArgument(String),
    /// Anything else the verifier could not classify
    #[error("verification failed: {0}")]
    Other(String),
}
