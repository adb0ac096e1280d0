//! Prompt rendering.
//!
//! The prompt is a pure function of the center date, the taxonomy and the
//! capped buckets: fixed instructions, then every provided article grouped
//! by category, then the output reminder.

use crate::curate::Buckets;
use crate::curate::window::{parse_published, window_bounds};
use crate::models::Category;
use crate::taxonomy::Taxonomy;
use chrono::{Duration, FixedOffset, NaiveDate};

/// Render the full summarization prompt.
pub fn build_prompt(center: NaiveDate, taxonomy: &Taxonomy, buckets: &Buckets, offset: &FixedOffset) -> String {
    let mut out = String::new();
    render_instructions(&mut out, center, taxonomy);
    render_articles(&mut out, buckets, offset);
    out.push_str("\nOutput JSON only. No prose, no markdown.\n");
    out
}

fn render_instructions(out: &mut String, center: NaiveDate, taxonomy: &Taxonomy) {
    let (start, _) = window_bounds(center);
    let labels = Category::ALL.map(Category::label).join("|");
    let categories: String = taxonomy
        .specs()
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            format!(
                "{}) {} 최대 {}건: {}\n",
                i + 1,
                spec.category.label(),
                spec.cap,
                spec.description
            )
        })
        .collect();

    out.push_str(&format!(
        "철강 정비 전문회사 관점에서 아래 제공된 한국 경제·산업 기사를 요약하라.\n\n\
         [기간]\n\
         - {first} ~ {last} (최근 3일, 기준일 {last}) 기사만 다룬다. 전일 기사 우선, 중복 최소화.\n\
         - 기준일 다음 날({next})까지 게시된 기사는 시차 보정으로 허용한다.\n\n\
         [카테고리]\n\
         {categories}\
         - 기사가 부족한 날은 있는 만큼만 쓰고 억지로 채우지 말 것.\n\n\
         [출력 형식(JSON): 반드시 아래 스키마만]\n\
         JSON array only. 각 원소 스키마:\n\
         {{\n\
         \x20 \"category\": \"{labels}\",\n\
         \x20 \"title\": \"굵은 표시 없는 평문 제목\",\n\
         \x20 \"src\": \"언론사/기관\",\n\
         \x20 \"url\": \"제공된 원문 링크 그대로\",\n\
         \x20 \"ts\": \"YYYY-MM-DD\",\n\
         \x20 \"points\": [\"- 핵심 요약 1\", \"- 핵심 요약 2(수치·정책명은 **굵게**)\"],\n\
         \x20 \"insight\": \"☞ 철강정비 관점 시사점 한 줄\"\n\
         }}\n\n\
         [중요]\n\
         - 아래 \"Provided Articles\" 목록의 기사만 사용한다. 목록에 없는 링크·사실은 절대 쓰지 말 것.\n\
         - 카테고리는 목록에 표시된 것을 따른다. 중복·유사 제목은 하나만 남긴다.\n",
        first = start.date().format("%Y-%m-%d"),
        last = center.format("%Y-%m-%d"),
        next = (center + Duration::days(1)).format("%Y-%m-%d"),
    ));
}

fn render_articles(out: &mut String, buckets: &Buckets, offset: &FixedOffset) {
    out.push_str("\nProvided Articles:\n");
    for (category, items) in buckets.iter() {
        out.push_str(&format!("## {}\n", category.label()));
        for item in items {
            let ts = item
                .published_at
                .as_deref()
                .map(|raw| match parse_published(raw, offset) {
                    Some(t) => t.date().format("%Y-%m-%d").to_string(),
                    None => raw.to_string(),
                })
                .unwrap_or_default();
            out.push_str(&format!(
                "- title: {}\n  src: {}\n  url: {}\n  ts: {}\n",
                item.title, item.source, item.url, ts
            ));
        }
    }
}
