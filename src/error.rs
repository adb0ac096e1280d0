//! Error types for every fallible boundary in the pipeline.
//!
//! Only [`ConfigError`] is fatal. Fetch and completion failures are
//! recovered by the stage that sees them; [`NewsError`] covers what can
//! still go wrong once a run has started (persisting the output).

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single outbound GET (feed, search API or article page).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    #[error("missing credentials for {0}")]
    MissingCredentials(&'static str),
}

/// Reason a candidate link was rejected by the liveness check.
///
/// Never surfaced past the verifier; the candidate is simply dropped.
#[derive(Debug, Error)]
pub enum LinkInvalid {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("status {0}")]
    Status(u16),

    #[error("page has no <title>")]
    NoTitle,

    #[error("title mismatch ({similarity:.2}): page title {page_title:?}")]
    TitleMismatch { similarity: f64, page_title: String },
}

/// Failure of one completion attempt.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The account has no quota left; retrying cannot help.
    #[error("quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion returned no content")]
    EmptyReply,

    #[error("reply is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CompletionError {
    /// Whether another attempt may succeed.
    pub fn is_retriable(&self) -> bool {
        !matches!(self, CompletionError::QuotaExhausted(_))
    }
}

/// Invalid or incomplete configuration, detected before any work begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is required (or run with --demo / DEMO_MODE=1)")]
    MissingApiKey,

    #[error("invalid run date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid UTC offset {0} hours")]
    InvalidOffset(i32),

    #[error("cannot read taxonomy file {path}: {source}")]
    TaxonomyIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid taxonomy file {path}: {source}")]
    TaxonomyYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Top-level run error.
#[derive(Debug, Error)]
pub enum NewsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
