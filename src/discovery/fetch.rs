//! Retrieval of the discovery document and the key set it references

use std::time::Duration;

use crate::{
    helpers::{convert_json_to, validate_url},
    http::request_async,
    jwks::Jwks,
    types::{DiscoveryDocument, HttpRequest, OidcHttpClient, ValidatorError, ValidatorResult},
};

use super::DiscoveryCacheConfig;

pub(crate) async fn fetch_discovery_document_async<T>(
    url: &url::Url,
    timeout: Duration,
    http_client: &T,
) -> ValidatorResult<DiscoveryDocument>
where
    T: OidcHttpClient,
{
    let req = HttpRequest::new(url.clone())
        .header("accept", "application/json")
        .expect_status_code(200)
        .timeout(timeout);

    let res = request_async(req, http_client).await?;

    let body = res.body.unwrap_or_default();

    convert_json_to::<DiscoveryDocument>(&body).map_err(|e| {
        ValidatorError::discovery_unavailable(format!("invalid discovery document at {url}: {e}"))
    })
}

pub(crate) async fn fetch_jwks_async<T>(
    jwks_uri: &url::Url,
    timeout: Duration,
    http_client: &T,
) -> ValidatorResult<Jwks>
where
    T: OidcHttpClient,
{
    let req = HttpRequest::new(jwks_uri.clone())
        .header("accept", "application/json,application/jwk-set+json")
        .expect_status_code(200)
        .timeout(timeout);

    let res = request_async(req, http_client).await?;

    let body = res.body.unwrap_or_default();

    Jwks::from_json(&body)
        .map_err(|e| ValidatorError::discovery_unavailable(format!("jwks was invalid: {e}")))
}

/// Fetches the discovery document at `url`, then the key set its `jwks_uri`
/// points at. Both must succeed for a key set to be returned.
pub(crate) async fn fetch_signing_keys_async<T>(
    url: &url::Url,
    issuer: &str,
    config: &DiscoveryCacheConfig,
    http_client: &T,
) -> ValidatorResult<Jwks>
where
    T: OidcHttpClient,
{
    tracing::info!(url = %url, "fetching discovery document");

    let document = fetch_discovery_document_async(url, config.fetch_timeout, http_client).await?;

    if config.require_issuer_match && document.issuer != issuer {
        tracing::error!(
            url = %url,
            expected = issuer,
            got = %document.issuer,
            "discovery document issuer mismatch"
        );
        return Err(ValidatorError::discovery_unavailable(format!(
            "discovery document issuer mismatch, expected {issuer}, got: {}",
            document.issuer
        )));
    }

    let jwks_uri = document.jwks_uri.as_deref().ok_or_else(|| {
        ValidatorError::discovery_unavailable("jwks_uri must be present in the discovery document")
    })?;

    let jwks_uri = validate_url("jwks_uri", jwks_uri)
        .map_err(|_| ValidatorError::discovery_unavailable(format!("invalid jwks_uri {jwks_uri}")))?;

    let jwks = fetch_jwks_async(&jwks_uri, config.fetch_timeout, http_client).await?;

    tracing::info!(
        url = %url,
        jwks_uri = %jwks_uri,
        key_count = jwks.len(),
        "fetched signing key set"
    );

    Ok(jwks)
}
