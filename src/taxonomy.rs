//! Static topic taxonomy and source lists, with an optional YAML overlay.
//!
//! The built-in table covers the steel-maintenance briefing. A YAML file can
//! replace keyword lists, caps, descriptions, search queries and feed URLs
//! without touching the fixed category set or its priority order.
//!
//! ```yaml
//! categories:
//!   maintenance-robotics-ai:
//!     keywords: ["정비", "로봇", "드론"]
//!     cap: 2
//! naver_queries: ["포스코 광양"]
//! rss_feeds: ["https://example.com/steel.xml"]
//! ```

use crate::models::Category;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Keyword table, cap and prompt description for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpec {
    pub category: Category,
    pub description: String,
    pub keywords: Vec<String>,
    pub cap: usize,
}

/// The full category table, always holding every [`Category`] in priority order.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    specs: Vec<CategorySpec>,
}

impl Taxonomy {
    /// Specs in priority order.
    pub fn specs(&self) -> &[CategorySpec] {
        &self.specs
    }

    pub fn spec(&self, category: Category) -> &CategorySpec {
        // `specs` is built from `Category::ALL`, so the index always matches.
        &self.specs[category as usize]
    }

    pub fn cap(&self, category: Category) -> usize {
        self.spec(category).cap
    }

    fn spec_mut(&mut self, category: Category) -> &mut CategorySpec {
        &mut self.specs[category as usize]
    }

    /// Apply a parsed overlay on top of this table.
    pub fn apply(&mut self, overlay: &CategoryOverlayMap) {
        for (category, o) in overlay {
            let spec = self.spec_mut(*category);
            if let Some(keywords) = &o.keywords {
                spec.keywords = keywords.clone();
            }
            if let Some(cap) = o.cap {
                spec.cap = cap;
            }
            if let Some(description) = &o.description {
                spec.description = description.clone();
            }
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for Taxonomy {
    fn default() -> Self {
        let specs = Category::ALL
            .iter()
            .map(|&category| match category {
                Category::SteelEconomy => CategorySpec {
                    category,
                    description: "글로벌/국내 강재·원료 가격(HRC·후판·철근·철광석·원료탄), 스프레드, \
                                  무역·관세(232·AD/CVD), 탄소·전력요금 등 정책. 수치·지표·정책명 명시."
                        .to_string(),
                    keywords: words(&[
                        "철강", "강재", "열연", "HRC", "후판", "철근", "냉연", "철광석", "원료탄",
                        "스크랩", "관세", "232", "반덤핑", "상계관세", "탄소", "전력요금", "스프레드",
                        "steel",
                    ]),
                    cap: 3,
                },
                Category::CorporateGroup => CategorySpec {
                    category,
                    description: "POSCO홀딩스/포스코/포스코인터내셔널/포스코퓨처엠/포스코이앤씨 등 \
                                  실적·CAPEX·조업/안전·노사·공급망. 포항/광양 현장 이슈 우선, 경영기획 시사점 포함."
                        .to_string(),
                    keywords: words(&[
                        "포스코", "POSCO", "포항", "광양", "포스코홀딩스", "포스코인터내셔널",
                        "포스코퓨처엠", "포스코이앤씨", "CAPEX", "노사", "조업",
                    ]),
                    cap: 3,
                },
                Category::MaintenanceRoboticsAi => CategorySpec {
                    category,
                    description: "제철소 설비정비·정기보수·PdM/CBM·예지보전, 정비 로봇/드론·비전검사·\
                                  디지털트윈·GenAI/Agent 도입·실증·ROI 사례. 철도/조선/항공 MRO 벤치마킹 허용."
                        .to_string(),
                    keywords: words(&[
                        "정비", "정기보수", "예지보전", "PdM", "CBM", "설비", "로봇", "드론",
                        "비전검사", "비전 검사", "디지털트윈", "디지털 트윈", "GenAI", "생성형",
                        "AI", "MRO",
                    ]),
                    cap: 2,
                },
                Category::Supplemental => CategorySpec {
                    category,
                    description: "철강산업 일반 또는 제조·사무 AI 혁신. 철강정비와의 연관성을 명확히 설명."
                        .to_string(),
                    keywords: Vec::new(),
                    cap: 2,
                },
            })
            .collect();
        Self { specs }
    }
}

/// Search queries sent to the news search API by default.
pub fn default_naver_queries() -> Vec<String> {
    words(&[
        "HRC 가격", "후판 가격", "철근 가격", "철광석 가격", "원료탄",
        "철강 관세 232", "철강 AD CVD", "탄소 정책 전력요금 철강",
        "포스코 포항", "포스코 광양", "POSCO 홀딩스", "포스코인터내셔널",
        "포스코퓨처엠", "포스코이앤씨", "포스코 안전 조업", "포스코 CAPEX",
        "예지보전 PdM CBM", "설비 정비 로봇", "드론 검사 제철소",
        "비전 검사 제철소", "디지털 트윈 제철소", "GenAI 정비",
    ])
}

/// RSS feeds polled by default: business and industry desks plus the
/// robotics trade press.
pub fn default_rss_feeds() -> Vec<String> {
    words(&[
        "https://www.hankyung.com/feed/industry",
        "https://www.mk.co.kr/rss/50300009/",
        "https://rss.etnews.com/Section901.xml",
        "http://www.irobotnews.com/rss/allArticle.xml",
    ])
}

/// Per-category fields a YAML file may override.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryOverlay {
    pub keywords: Option<Vec<String>>,
    pub cap: Option<usize>,
    pub description: Option<String>,
}

pub type CategoryOverlayMap = BTreeMap<Category, CategoryOverlay>;

/// Shape of the optional taxonomy YAML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxonomyFile {
    #[serde(default)]
    pub categories: CategoryOverlayMap,
    pub naver_queries: Option<Vec<String>>,
    pub rss_feeds: Option<Vec<String>>,
}
