//! RSS 2.0 feed source.
//!
//! Only `<item>` title, link and pubDate are read; everything else in the
//! channel is ignored, including elements placed between items.

use crate::error::FetchError;
use crate::http::{HttpFetch, HttpRequest};
use crate::models::Candidate;
use crate::utils::strip_html;
use quick_xml::de::{Deserializer, EntityResolver};
use quick_xml::escape::{resolve_html5_entity, resolve_predefined_entity};
use quick_xml::events::BytesText;
use serde::Deserialize;
use std::convert::Infallible;
use tracing::{info, instrument};

/// Resolves the XML entities plus every named HTML5 entity, which feeds
/// routinely use outside CDATA (`&nbsp;`, `&middot;`, `&copy;`).
struct Html5Entities;

impl EntityResolver for Html5Entities {
    type Error = Infallible;

    fn capture(&mut self, _doctype: BytesText) -> Result<(), Self::Error> {
        Ok(())
    }

    fn resolve(&self, entity: &str) -> Option<&str> {
        resolve_predefined_entity(entity).or_else(|| resolve_html5_entity(entity))
    }
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// Fetch one feed and return its items in feed order.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_feed<H: HttpFetch>(http: &H, url: &str) -> Result<Vec<Candidate>, FetchError> {
    let resp = http.fetch(&HttpRequest::get(url)).await?.require_ok(url)?;
    let candidates = parse_feed(&resp.body)?;
    info!(count = candidates.len(), "Parsed RSS feed");
    Ok(candidates)
}

/// Parse an RSS document; items without a title or link are skipped.
pub fn parse_feed(xml: &str) -> Result<Vec<Candidate>, FetchError> {
    let mut de = Deserializer::from_str_with_resolver(xml, Html5Entities);
    let rss = Rss::deserialize(&mut de)?;
    let candidates = rss
        .channel
        .items
        .into_iter()
        .filter_map(|it| {
            let title = strip_html(it.title.as_deref().unwrap_or_default());
            let link = it.link.as_deref().map(str::trim).unwrap_or_default().to_string();
            if title.is_empty() || link.is_empty() {
                return None;
            }
            Some(Candidate::new(title, link, it.pub_date.map(|d| d.trim().to_string())))
        })
        .collect();
    Ok(candidates)
}
