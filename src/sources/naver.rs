//! Naver news search API source.
//!
//! One authenticated GET per query, newest first. Titles come back with
//! `<b>` highlighting and HTML entities, which are stripped.

use crate::config::NaverCredentials;
use crate::error::FetchError;
use crate::http::{HttpFetch, HttpRequest};
use crate::models::Candidate;
use crate::utils::strip_html;
use serde::Deserialize;
use tracing::{info, instrument};

pub const NAVER_NEWS_ENDPOINT: &str = "https://openapi.naver.com/v1/search/news.json";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    originallink: String,
    #[serde(default)]
    link: String,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// Run one search query and return the hits in API order.
#[instrument(level = "info", skip(http, credentials))]
pub async fn search<H: HttpFetch>(
    http: &H,
    credentials: &NaverCredentials,
    query: &str,
    page_size: u32,
) -> Result<Vec<Candidate>, FetchError> {
    let request = HttpRequest::get(NAVER_NEWS_ENDPOINT)
        .header("X-Naver-Client-Id", &credentials.client_id)
        .header("X-Naver-Client-Secret", &credentials.client_secret)
        .query("query", query)
        .query("display", page_size)
        .query("sort", "date");

    let resp = http
        .fetch(&request)
        .await?
        .require_ok(NAVER_NEWS_ENDPOINT)?;
    let candidates = parse_response(&resp.body)?;
    info!(count = candidates.len(), "Naver search returned");
    Ok(candidates)
}

/// Parse the JSON `items` array. The publisher's own URL is preferred over
/// the Naver mirror.
pub fn parse_response(body: &str) -> Result<Vec<Candidate>, FetchError> {
    let parsed: SearchResponse = serde_json::from_str(body)?;
    let candidates = parsed
        .items
        .into_iter()
        .filter_map(|it| {
            let url = [it.originallink.trim(), it.link.trim()]
                .into_iter()
                .find(|u| !u.is_empty())?
                .to_string();
            let title = strip_html(&it.title);
            if title.is_empty() {
                return None;
            }
            Some(Candidate::new(title, url, it.pub_date))
        })
        .collect();
    Ok(candidates)
}
