//! Keyword-score categorization and per-category capping.

use crate::models::{Candidate, Category};
use crate::taxonomy::Taxonomy;
use std::collections::BTreeMap;
use tracing::info;

/// Candidates grouped by category. Every category is present, iteration
/// follows priority order, and each list keeps discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets {
    inner: BTreeMap<Category, Vec<Candidate>>,
}

impl Default for Buckets {
    fn default() -> Self {
        Self {
            inner: Category::ALL.iter().map(|&c| (c, Vec::new())).collect(),
        }
    }
}

impl Buckets {
    pub fn get(&self, category: Category) -> &[Candidate] {
        self.inner.get(&category).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Candidate])> {
        self.inner.iter().map(|(c, items)| (*c, items.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.inner.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn push(&mut self, category: Category, candidate: Candidate) {
        self.inner.entry(category).or_default().push(candidate);
    }
}

/// Number of the category's keywords found in `title` (case-insensitive
/// substring match).
pub fn score(title: &str, keywords: &[String]) -> usize {
    let title = title.to_lowercase();
    keywords
        .iter()
        .filter(|k| !k.is_empty() && title.contains(&k.to_lowercase()))
        .count()
}

/// Category with the highest score; ties go to the higher-priority
/// category, and a zero score everywhere means [`Category::Supplemental`].
pub fn classify(title: &str, taxonomy: &Taxonomy) -> Category {
    let mut best = (0usize, Category::Supplemental);
    for spec in taxonomy.specs() {
        let s = score(title, &spec.keywords);
        if s > best.0 {
            best = (s, spec.category);
        }
    }
    best.1
}

/// Sort verified candidates into buckets.
pub fn categorize(candidates: Vec<Candidate>, taxonomy: &Taxonomy) -> Buckets {
    let mut buckets = Buckets::default();
    for candidate in candidates {
        let category = classify(&candidate.title, taxonomy);
        buckets.push(category, candidate);
    }
    buckets
}

/// Truncate every bucket to its category's cap, keeping discovery order.
pub fn cap(buckets: Buckets, taxonomy: &Taxonomy) -> Buckets {
    let inner = buckets
        .inner
        .into_iter()
        .map(|(category, mut items)| {
            items.truncate(taxonomy.cap(category));
            (category, items)
        })
        .collect();
    let capped = Buckets { inner };
    for (category, items) in capped.iter() {
        info!(%category, count = items.len(), cap = taxonomy.cap(category), "Capped category");
    }
    capped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(title: &str, n: usize) -> Candidate {
        Candidate::new(title, format!("https://news.example.com/{n}"), None)
    }

    #[test]
    fn test_classify_by_highest_score() {
        let t = Taxonomy::default();
        assert_eq!(classify("열연 가격 3주 연속 상승", &t), Category::SteelEconomy);
        assert_eq!(classify("포스코퓨처엠 CAPEX 조정", &t), Category::CorporateGroup);
        // 포스코 (1) vs 정비 + 로봇 (2)
        assert_eq!(classify("포스코, 정비 로봇 도입", &t), Category::MaintenanceRoboticsAi);
    }

    #[test]
    fn test_classify_tie_goes_to_priority() {
        let t = Taxonomy::default();
        // 철강 (steel) vs 포스코 (group): 1-1
        assert_eq!(classify("포스코 철강 부문", &t), Category::SteelEconomy);
    }

    #[test]
    fn test_classify_case_insensitive() {
        let t = Taxonomy::default();
        assert_eq!(classify("posco capex plan", &t), Category::CorporateGroup);
    }

    #[test]
    fn test_zero_keywords_is_supplemental_and_deterministic() {
        let t = Taxonomy::default();
        for _ in 0..3 {
            assert_eq!(classify("오늘의 날씨", &t), Category::Supplemental);
            assert_eq!(classify("", &t), Category::Supplemental);
        }
    }

    #[test]
    fn test_categorize_keeps_discovery_order() {
        let t = Taxonomy::default();
        let buckets = categorize(
            vec![c("철근 가격 하락", 1), c("오늘의 날씨", 2), c("후판 협상", 3)],
            &t,
        );
        let steel: Vec<&str> = buckets.get(Category::SteelEconomy).iter().map(|c| c.url.as_str()).collect();
        assert_eq!(steel, vec!["https://news.example.com/1", "https://news.example.com/3"]);
        assert_eq!(buckets.get(Category::Supplemental).len(), 1);
        assert_eq!(buckets.total(), 3);
        assert_eq!(buckets.iter().count(), 4);
    }

    #[test]
    fn test_cap_truncates_without_mixing() {
        let t = Taxonomy::default();
        let titles: Vec<Candidate> = (0..5).map(|i| c("열연 가격", i)).chain([c("포스코 광양", 9)]).collect();
        let buckets = categorize(titles, &t);
        let capped = cap(buckets.clone(), &t);

        assert_eq!(capped.get(Category::SteelEconomy).len(), 3);
        assert_eq!(capped.get(Category::SteelEconomy), &buckets.get(Category::SteelEconomy)[..3]);
        assert_eq!(capped.get(Category::CorporateGroup), buckets.get(Category::CorporateGroup));
        for (category, items) in capped.iter() {
            assert!(items.len() <= buckets.get(category).len());
            assert!(items.iter().all(|i| classify(&i.title, &t) == category));
        }
    }

    #[test]
    fn test_maintenance_capped_at_two() {
        let t = Taxonomy::default();
        let items = (0..4).map(|i| c("제철소 정비 로봇 실증", i)).collect();
        let capped = cap(categorize(items, &t), &t);
        assert_eq!(capped.get(Category::MaintenanceRoboticsAi).len(), 2);
    }

    #[test]
    fn test_cap_never_pads() {
        let t = Taxonomy::default();
        let capped = cap(categorize(vec![c("포스코 광양", 1)], &t), &t);
        assert_eq!(capped.total(), 1);
        assert!(capped.get(Category::MaintenanceRoboticsAi).is_empty());
    }
}
