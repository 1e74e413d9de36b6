use serde_json::Value;

use crate::types::{HttpRequest, HttpResponse, OidcHttpClient, ValidatorError, ValidatorResult};

/// Sends `req` through `http_client` and checks that the response has the
/// expected status and a non-empty JSON body. Any other outcome is reported as
/// [ValidatorError::DiscoveryUnavailable].
pub(crate) async fn request_async<T>(req: HttpRequest, http_client: &T) -> ValidatorResult<HttpResponse>
where
    T: OidcHttpClient,
{
    let url = req.url.to_string();
    let expected_status = req.expected_status;

    let res = http_client.request(req).await.map_err(|e| {
        tracing::error!(url = %url, error = %e, "request failed");
        ValidatorError::discovery_unavailable(format!("request to {url} failed: {e}"))
    })?;

    if res.status_code != expected_status {
        tracing::error!(url = %url, status = res.status_code, "unexpected status code");
        return Err(ValidatorError::discovery_unavailable(format!(
            "expected {} from {url}, got: {}",
            expected_status, res.status_code
        )));
    }

    let body = match res.body.as_deref() {
        Some(body) if !body.is_empty() => body,
        _ => {
            return Err(ValidatorError::discovery_unavailable(format!(
                "expected response body from {url}"
            )))
        }
    };

    if serde_json::from_str::<Value>(body).is_err() {
        return Err(ValidatorError::discovery_unavailable(format!(
            "expected JSON response body from {url}"
        )));
    }

    Ok(res)
}
