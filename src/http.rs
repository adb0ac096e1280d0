//! Outbound GET capability.
//!
//! Feed polling, search API calls and liveness checks all go through
//! [`HttpFetch`], so the whole curation pipeline can run against a canned
//! implementation in tests.

use crate::config::HttpSettings;
use crate::error::FetchError;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, instrument};

/// A GET request: URL plus extra headers and query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }
}

/// Status and decoded body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Turn anything but 200 into [`FetchError::Status`].
    pub fn require_ok(self, url: &str) -> Result<Self, FetchError> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(FetchError::Status {
                status: self.status,
                url: url.to_string(),
            })
        }
    }
}

/// Capability for a single GET.
///
/// Implementations must not retry; callers decide what a failure means.
pub trait HttpFetch {
    async fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// [`HttpFetch`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestHttp {
    client: Client,
}

impl ReqwestHttp {
    /// Build the client with a fixed timeout and browser-like identity.
    ///
    /// # Errors
    ///
    /// Fails only if the TLS backend cannot be initialised.
    pub fn new(settings: &HttpSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

impl HttpFetch for ReqwestHttp {
    #[instrument(level = "debug", skip_all, fields(url = %request.url))]
    async fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        let t0 = Instant::now();
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        debug!(
            status,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "GET completed"
        );
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = HttpRequest::get("https://openapi.naver.com/v1/search/news.json")
            .header("X-Naver-Client-Id", "id")
            .query("display", 10)
            .query("sort", "date");
        assert_eq!(req.headers, vec![("X-Naver-Client-Id".into(), "id".into())]);
        assert_eq!(req.query[0], ("display".to_string(), "10".to_string()));
        assert_eq!(req.query.len(), 2);
    }

    #[test]
    fn test_require_ok() {
        let ok = HttpResponse { status: 200, body: String::new() };
        assert!(ok.require_ok("u").is_ok());

        let gone = HttpResponse { status: 404, body: String::new() };
        let err = gone.require_ok("https://example.com/x").unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }
}
