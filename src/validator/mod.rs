//! # Validator
//! ID Token validation: policy construction, verification and nonce check.

mod token_validator;
mod verifier;

pub use token_validator::TokenValidator;
pub use verifier::{JoseVerifier, TokenVerifier};
