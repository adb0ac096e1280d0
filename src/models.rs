//! Data models for curated candidates and the summary cards written to disk.
//!
//! - [`Candidate`]: a raw news item discovered from a feed or search source
//! - [`Category`]: the fixed, ordered topic taxonomy
//! - [`SummaryCard`]: one persisted card; field names follow the output file
//!   contract (`src`, `ts`)

use serde::{Deserialize, Serialize};
use std::fmt;

/// A news item discovered by a source, before verification.
///
/// Candidates are never mutated after creation; filters either keep or drop
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Headline as published by the feed (markup already stripped).
    pub title: String,
    /// Article URL.
    pub url: String,
    /// Outlet name, derived from the URL host.
    pub source: String,
    /// Raw publish timestamp as the feed reported it.
    pub published_at: Option<String>,
}

impl Candidate {
    pub fn new(title: impl Into<String>, url: impl Into<String>, published_at: Option<String>) -> Self {
        let title = title.into();
        let url = url.into();
        let source = source_from_url(&url).unwrap_or_else(|| "unknown".to_string());
        Self {
            title,
            url,
            source,
            published_at,
        }
    }

    /// Identity key used by deduplication.
    pub fn key(&self) -> (String, String) {
        (self.title.trim().to_string(), self.url.trim().to_string())
    }
}

/// Derive an outlet name from a URL host, dropping a leading `www.`.
///
/// ```ignore
/// assert_eq!(source_from_url("https://www.hankyung.com/a/1"), Some("hankyung.com".into()));
/// ```
pub fn source_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Topic categories in priority order.
///
/// The derived `Ord` follows declaration order, which is also the
/// tie-break order used when two categories score the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    SteelEconomy,
    CorporateGroup,
    MaintenanceRoboticsAi,
    Supplemental,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::SteelEconomy,
        Category::CorporateGroup,
        Category::MaintenanceRoboticsAi,
        Category::Supplemental,
    ];

    /// Label used in prompts and in the `category` field of the output.
    pub fn label(self) -> &'static str {
        match self {
            Category::SteelEconomy => "철강경제",
            Category::CorporateGroup => "포스코그룹",
            Category::MaintenanceRoboticsAi => "정비 로봇·AI정비",
            Category::Supplemental => "보충",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single summary card as persisted to `docs/data/<date>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCard {
    pub category: String,
    pub title: String,
    #[serde(rename = "src")]
    pub source: String,
    pub url: String,
    /// Date in `YYYY-MM-DD` form.
    #[serde(rename = "ts")]
    pub date: String,
    pub points: Vec<String>,
    pub insight: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_source_from_host() {
        let c = Candidate::new("제목", "https://www.hankyung.com/article/1", None);
        assert_eq!(c.source, "hankyung.com");

        let c = Candidate::new("제목", "https://n.news.naver.com/mnews/1", None);
        assert_eq!(c.source, "n.news.naver.com");
    }

    #[test]
    fn test_candidate_source_unparseable_url() {
        let c = Candidate::new("제목", "not a url", None);
        assert_eq!(c.source, "unknown");
    }

    #[test]
    fn test_candidate_key_trims() {
        let a = Candidate::new("  포스코 실적 ", " https://example.com/a ", None);
        let b = Candidate::new("포스코 실적", "https://example.com/a", None);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_category_priority_order() {
        assert!(Category::SteelEconomy < Category::CorporateGroup);
        assert!(Category::CorporateGroup < Category::MaintenanceRoboticsAi);
        assert!(Category::MaintenanceRoboticsAi < Category::Supplemental);
    }

    #[test]
    fn test_summary_card_field_names() {
        let card = SummaryCard {
            category: Category::SteelEconomy.label().to_string(),
            title: "열연 가격 반등".to_string(),
            source: "hankyung.com".to_string(),
            url: "https://www.hankyung.com/article/1".to_string(),
            date: "2025-09-26".to_string(),
            points: vec!["- 요약".to_string()],
            insight: "☞ 시사점".to_string(),
        };

        let value = serde_json::to_value(&card).unwrap();
        let obj = value.as_object().unwrap();
        for key in ["category", "title", "src", "url", "ts", "points", "insight"] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj["category"], "철강경제");
        assert_eq!(obj["ts"], "2025-09-26");
    }
}
