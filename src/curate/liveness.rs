//! Liveness check: the link answers 200 and its page title matches the
//! feed title.
//!
//! Candidates are checked one at a time. The loop stops as soon as
//! `max_verified` candidates have passed, which bounds total run time.

use crate::config::HttpSettings;
use crate::error::LinkInvalid;
use crate::http::{HttpFetch, HttpRequest};
use crate::models::Candidate;
use crate::utils::strip_html;
use futures::future;
use futures::stream::{self, StreamExt};
use scraper::{Html, Selector};
use strsim::normalized_levenshtein;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
pub struct LivenessSettings {
    /// Minimum title similarity in `0.0..=1.0`.
    pub threshold: f64,
    /// Stop after this many candidates pass.
    pub max_verified: usize,
}

impl Default for LivenessSettings {
    fn default() -> Self {
        Self {
            threshold: 0.35,
            max_verified: 80,
        }
    }
}

/// Text of the first `<title>` element, if any.
pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    let title = document
        .select(&selector)
        .next()?
        .text()
        .collect::<String>();
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}

/// Lowercase, tag-free, punctuation-free form used for comparison.
fn normalize(s: &str) -> String {
    strip_html(s)
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity between a feed title and a page title.
///
/// Page titles usually append the outlet name (`"제목 - 한국경제"`,
/// `"제목 | 전자신문"`), so each delimited segment is compared as well and
/// the best score wins.
pub fn title_similarity(feed_title: &str, page_title: &str) -> f64 {
    let feed = normalize(feed_title);
    if feed.is_empty() {
        return 0.0;
    }

    std::iter::once(page_title)
        .chain(page_title.split(" - "))
        .chain(page_title.split(" | "))
        .chain(page_title.split(" :: "))
        .map(normalize)
        .filter(|p| !p.is_empty())
        .map(|p| normalized_levenshtein(&feed, &p))
        .fold(0.0, f64::max)
}

/// Check a single candidate.
///
/// Returns the similarity score on success; any failure is a rejection.
pub async fn check_link<H: HttpFetch>(
    http: &H,
    candidate: &Candidate,
    settings: &LivenessSettings,
    user_agent: &str,
) -> Result<f64, LinkInvalid> {
    let request = HttpRequest::get(candidate.url.trim()).header("User-Agent", user_agent);
    let resp = http.fetch(&request).await?;
    if !resp.is_ok() {
        return Err(LinkInvalid::Status(resp.status));
    }

    let page_title = page_title(&resp.body).ok_or(LinkInvalid::NoTitle)?;
    let similarity = title_similarity(&candidate.title, &page_title);
    if similarity >= settings.threshold {
        Ok(similarity)
    } else {
        Err(LinkInvalid::TitleMismatch {
            similarity,
            page_title,
        })
    }
}

/// Verify candidates in order, keeping those that pass, until
/// `max_verified` have passed or the input runs out.
#[instrument(level = "info", skip_all, fields(candidates = candidates.len()))]
pub async fn verify_all<H: HttpFetch>(
    http: &H,
    candidates: Vec<Candidate>,
    settings: &LivenessSettings,
    http_settings: &HttpSettings,
) -> Vec<Candidate> {
    let total = candidates.len();
    let verified: Vec<Candidate> = stream::iter(candidates.into_iter().enumerate())
        .then(|(i, candidate)| async move {
            if i > 0 && !http_settings.request_delay.is_zero() {
                sleep(http_settings.request_delay).await;
            }
            match check_link(http, &candidate, settings, &http_settings.user_agent).await {
                Ok(similarity) => {
                    debug!(url = %candidate.url, similarity, "Link verified");
                    Some(candidate)
                }
                Err(reason) => {
                    debug!(url = %candidate.url, %reason, "Link rejected");
                    None
                }
            }
        })
        .filter_map(future::ready)
        .take(settings.max_verified)
        .collect()
        .await;

    info!(
        total,
        verified = verified.len(),
        ceiling = settings.max_verified,
        "Liveness check complete"
    );
    verified
}
