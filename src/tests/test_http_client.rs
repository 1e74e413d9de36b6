use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use parking_lot::Mutex;
use url::Url;

use crate::types::{HttpRequest, HttpResponse, OidcHttpClient};

pub struct TestHttpReqRes {
    pub url: Url,
    pub headers: HashMap<String, Vec<String>>,

    pub response_body: Option<String>,
    pub response_status_code: u16,
    pub transport_error: Option<String>,
    pub latency: Option<Duration>,
}

impl TestHttpReqRes {
    pub fn new(url: impl Into<String>) -> Self {
        TestHttpReqRes {
            url: Url::parse(&url.into()).unwrap(),
            headers: HashMap::new(),
            response_body: None,
            response_status_code: 200,
            transport_error: None,
            latency: None,
        }
    }

    pub fn assert_request_header(mut self, key: impl Into<String>, value: Vec<String>) -> Self {
        self.headers.insert(key.into(), value);
        self
    }

    pub fn set_response_body(mut self, response_body: impl Into<String>) -> Self {
        self.response_body = Some(response_body.into());
        self
    }

    pub fn set_response_status_code(mut self, response_status_code: u16) -> Self {
        self.response_status_code = response_status_code;
        self
    }

    pub fn set_transport_error(mut self, error: impl Into<String>) -> Self {
        self.transport_error = Some(error.into());
        self
    }

    pub fn set_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn build(self) -> TestHttpClient {
        TestHttpClient::new().add(self)
    }
}

/// Replays scripted responses in order and asserts every request matches the
/// script. Cloning shares the script and the request counter.
#[derive(Clone)]
pub struct TestHttpClient {
    req_res: Arc<Mutex<VecDeque<TestHttpReqRes>>>,
    requests: Arc<AtomicUsize>,
}

impl TestHttpClient {
    pub fn new() -> Self {
        Self {
            req_res: Arc::new(Mutex::new(VecDeque::with_capacity(5))),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn add(self, req_res: TestHttpReqRes) -> Self {
        self.req_res.lock().push_back(req_res);
        self
    }

    pub fn push(&self, req_res: TestHttpReqRes) {
        self.req_res.lock().push_back(req_res);
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn assert(&self) {
        assert!(self.req_res.lock().is_empty(), "All requests not fullfilled");
    }
}

impl OidcHttpClient for TestHttpClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, String> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let req_res = self
            .req_res
            .lock()
            .pop_front()
            .unwrap_or_else(|| panic!("Unexpected request to {}", req.url));

        assert_eq!(req.url, req_res.url);

        for (name, values) in &req_res.headers {
            assert_eq!(req.headers.get(name), Some(values), "header {name}");
        }

        if let Some(latency) = req_res.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(e) = req_res.transport_error {
            return Err(e);
        }

        Ok(HttpResponse {
            body: req_res.response_body,
            status_code: req_res.response_status_code,
        })
    }
}
