//! Test doubles for the HTTP and completion capabilities.

use crate::api::{Completion, CompletionRequest, RetryPolicy};
use crate::config::Config;
use crate::error::{CompletionError, FetchError};
use crate::http::{HttpFetch, HttpRequest, HttpResponse};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Canned GET responses keyed by URL (query string ignored). Unknown URLs
/// answer 404. Every request is recorded.
#[derive(Default)]
pub struct MockHttp {
    routes: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes.insert(url.to_string(), (status, body.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpFetch for MockHttp {
    async fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        let (status, body) = self
            .routes
            .get(&request.url)
            .cloned()
            .unwrap_or((404, String::new()));
        Ok(HttpResponse { status, body })
    }
}

type Script = Box<dyn Fn(usize) -> Result<String, CompletionError> + Send + Sync>;

/// Completion double driven by a closure of the zero-based attempt number.
pub struct ScriptedCompletion {
    script: Script,
    attempts: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedCompletion {
    pub fn new(script: impl Fn(usize) -> Result<String, CompletionError> + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            attempts: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn always(reply: &str) -> Self {
        let reply = reply.to_string();
        Self::new(move |_| Ok(reply.clone()))
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

impl Completion for ScriptedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(request.prompt.clone());
        (self.script)(attempt)
    }
}

/// Default configuration with every sleep set to zero and no live sources.
pub fn zero_delay_config() -> Config {
    let mut config = Config::new("unused");
    config.http.request_delay = Duration::ZERO;
    config.retry = RetryPolicy {
        max_attempts: 4,
        rate_limit_base: Duration::ZERO,
        transient_base: Duration::ZERO,
        max_jitter: Duration::ZERO,
    };
    config.rss_feeds.clear();
    config.naver_queries.clear();
    config
}

/// Minimal RSS document from `(title, link, pubDate)` triples; an empty
/// pubDate omits the element.
pub fn rss_document(items: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>test</title>"#);
    for (title, link, pub_date) in items {
        xml.push_str("<item>");
        xml.push_str(&format!("<title>{title}</title><link>{link}</link>"));
        if !pub_date.is_empty() {
            xml.push_str(&format!("<pubDate>{pub_date}</pubDate>"));
        }
        xml.push_str("</item>");
    }
    xml.push_str("</channel></rss>");
    xml
}

/// Article page whose `<title>` is `title`.
pub fn html_page(title: &str) -> String {
    format!("<!doctype html><html><head><title>{title}</title></head><body><p>본문</p></body></html>")
}
