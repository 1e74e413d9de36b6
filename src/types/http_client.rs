//! # Transport seam
//! The discovery cache only ever issues `GET` requests for JSON documents.
//! Plug in any HTTP stack by implementing [OidcHttpClient].

use std::{collections::HashMap, time::Duration};

use url::Url;

/// # HttpRequest
/// A `GET` for a discovery document or a JWK Set.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Absolute http(s) URL to fetch
    pub url: Url,
    /// Request headers, by lowercase name
    pub headers: HashMap<String, Vec<String>>,
    /// Upper bound for the whole request. Clients should honour it, the cache
    /// enforces it regardless.
    pub timeout: Option<Duration>,
    /// The only status code the fetch accepts. The body must then be
    /// non-empty JSON.
    pub(crate) expected_status: u16,
}

impl HttpRequest {
    pub(crate) fn new(url: Url) -> Self {
        Self {
            url,
            headers: HashMap::new(),
            timeout: None,
            expected_status: 200,
        }
    }

    pub(crate) fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    pub(crate) fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn expect_status_code(mut self, code: u16) -> Self {
        self.expected_status = code;
        self
    }
}

/// # HttpResponse
/// Whatever the server answered, error statuses included.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code as sent by the server
    pub status_code: u16,
    /// Response body. `None` when the server sent nothing.
    pub body: Option<String>,
}

/// HTTP transport used to retrieve discovery documents and key sets.
///
/// The returned future must be `Send` because fetches are shared between
/// concurrent callers of [crate::discovery::DiscoveryCache].
pub trait OidcHttpClient {
    /// Performs `req`.
    ///
    /// Resolve to `Ok` for any response the server produced, whatever its
    /// status, and to `Err` with a description only when no response was
    /// received (DNS, TLS, connection or timeout failures).
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, String>> + Send;
}
