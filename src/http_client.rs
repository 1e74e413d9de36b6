use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::types::{HttpRequest, HttpResponse, OidcHttpClient};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// [OidcHttpClient] backed by a pooled [reqwest::Client]
#[derive(Debug, Clone)]
pub struct DefaultHttpClient {
    client: Client,
}

impl DefaultHttpClient {
    /// Builds the client. Connecting is capped at 10 seconds, the whole
    /// request at whatever [HttpRequest::timeout] says.
    pub fn new() -> Result<Self, String> {
        ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .map(|client| Self { client })
            .map_err(|e| format!("could not build reqwest client: {e}"))
    }
}

impl OidcHttpClient for DefaultHttpClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, String> {
        let mut builder = self.client.get(req.url);

        if let Some(timeout) = req.timeout {
            builder = builder.timeout(timeout);
        }

        for (name, value) in req
            .headers
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name, v)))
        {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| e.to_string())?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| format!("could not read response body: {e}"))?;

        Ok(HttpResponse {
            status_code,
            body: (!body.is_empty()).then_some(body),
        })
    }
}
