//! Cards built straight from the capped candidates, without the LLM.
//!
//! Used when summarization returns nothing and for demo runs. Title,
//! source and URL are carried through verbatim, so every card points at a
//! verified (or fixture) article.

use crate::curate::Buckets;
use crate::models::SummaryCard;
use crate::taxonomy::Taxonomy;
use chrono::NaiveDate;

/// Which placeholder text a composed card carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardMark {
    Fallback,
    Demo,
}

impl CardMark {
    fn points(self) -> Vec<String> {
        match self {
            CardMark::Fallback => vec![
                "- (폴백) 기사 원문 참조".to_string(),
                "- (폴백) 세부 요약은 요약 서비스 복구 후 제공".to_string(),
            ],
            CardMark::Demo => vec![
                "- (데모) 핵심 요약 1".to_string(),
                "- (데모) 핵심 요약 2".to_string(),
            ],
        }
    }

    fn insight(self) -> &'static str {
        match self {
            CardMark::Fallback => "☞ (폴백) 오늘은 링크 카드만 제공됩니다.",
            CardMark::Demo => "☞ (데모) 철강정비 관점의 시사점",
        }
    }
}

/// One card per candidate, up to each category's cap, in category order.
pub fn compose_cards(buckets: &Buckets, taxonomy: &Taxonomy, center: NaiveDate, mark: CardMark) -> Vec<SummaryCard> {
    let date = center.format("%Y-%m-%d").to_string();
    buckets
        .iter()
        .flat_map(|(category, items)| {
            items
                .iter()
                .take(taxonomy.cap(category))
                .map(move |c| (category, c))
        })
        .map(|(category, c)| SummaryCard {
            category: category.label().to_string(),
            title: c.title.clone(),
            source: c.source.clone(),
            url: c.url.clone(),
            date: date.clone(),
            points: mark.points(),
            insight: mark.insight().to_string(),
        })
        .collect()
}
