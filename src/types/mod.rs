//! # Types Module
//! Requests, responses, errors, policies and outcomes used across the crate

mod decoded_token;
mod discovery_document;
mod errors;
pub mod http_client;
mod validation;

pub use decoded_token::DecodedToken;
pub use discovery_document::DiscoveryDocument;
pub(crate) use errors::require_non_empty;
pub use errors::{ValidatorError, ValidatorResult, VerificationError};
pub use http_client::{HttpRequest, HttpResponse, OidcHttpClient};
pub use validation::{
    FailureReason, ValidationOutcome, ValidationPolicy, VerifiedPayload, CLOCK_SKEW,
};
