//! Candidate sources.
//!
//! A [`Feed`] is either the live source list (RSS feeds and search
//! queries, fetched through [`HttpFetch`]) or a fixed set of demo
//! candidates. Everything downstream treats both the same way.
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | Industry RSS feeds | [`rss`] | RSS 2.0 XML |
//! | Naver news search | [`naver`] | JSON API, needs credentials |
//! | Demo | [`fixture`] | Static, no network |

pub mod fixture;
pub mod naver;
pub mod rss;

use crate::config::{Config, NaverCredentials};
use crate::error::FetchError;
use crate::http::HttpFetch;
use crate::models::Candidate;
use chrono::NaiveDate;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// One endpoint in the live source list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Rss { url: String },
    NaverSearch { query: String },
}

impl SourceSpec {
    fn label(&self) -> &str {
        match self {
            SourceSpec::Rss { url } => url,
            SourceSpec::NaverSearch { query } => query,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Feed {
    Live {
        sources: Vec<SourceSpec>,
        naver: Option<NaverCredentials>,
        page_size: u32,
    },
    /// Pre-built candidates; trusted, never re-verified over the network.
    Fixture(Vec<Candidate>),
}

impl Feed {
    /// Build the live source list from configuration. Search queries are
    /// dropped when no credentials are configured.
    pub fn live(config: &Config) -> Self {
        let mut sources: Vec<SourceSpec> = config
            .rss_feeds
            .iter()
            .map(|url| SourceSpec::Rss { url: url.clone() })
            .collect();

        if config.naver.is_some() {
            sources.extend(
                config
                    .naver_queries
                    .iter()
                    .map(|query| SourceSpec::NaverSearch { query: query.clone() }),
            );
        } else {
            info!(
                queries = config.naver_queries.len(),
                "Naver credentials missing; search source yields no candidates"
            );
        }

        Feed::Live {
            sources,
            naver: config.naver.clone(),
            page_size: config.naver_page_size,
        }
    }

    pub fn demo(center_date: NaiveDate) -> Self {
        Feed::Fixture(fixture::demo_candidates(center_date))
    }

    /// Whether candidates from this feed skip the liveness check.
    pub fn is_trusted(&self) -> bool {
        matches!(self, Feed::Fixture(_))
    }

    /// Pull every source in order. A failing source is logged and skipped;
    /// if all fail the result is simply empty.
    #[instrument(level = "info", skip_all)]
    pub async fn collect<H: HttpFetch>(&self, http: &H, config: &Config) -> Vec<Candidate> {
        let (sources, naver, page_size) = match self {
            Feed::Fixture(candidates) => {
                info!(count = candidates.len(), "Using demo candidates");
                return candidates.clone();
            }
            Feed::Live {
                sources,
                naver,
                page_size,
            } => (sources, naver, *page_size),
        };

        let mut all = Vec::new();
        let mut failed = 0usize;
        for (i, source) in sources.iter().enumerate() {
            if i > 0 && !config.http.request_delay.is_zero() {
                sleep(config.http.request_delay).await;
            }

            let result = match source {
                SourceSpec::Rss { url } => rss::fetch_feed(http, url).await,
                SourceSpec::NaverSearch { query } => match naver {
                    Some(credentials) => naver::search(http, credentials, query, page_size).await,
                    None => Err(FetchError::MissingCredentials("naver")),
                },
            };

            match result {
                Ok(mut items) => all.append(&mut items),
                Err(e) => {
                    failed += 1;
                    warn!(source = %source.label(), error = %e, "Source unavailable; skipping");
                }
            }
        }

        info!(
            sources = sources.len(),
            failed,
            candidates = all.len(),
            "Collected candidates"
        );
        all
    }
}
