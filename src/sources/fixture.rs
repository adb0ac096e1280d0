//! Static sample candidates for demo runs.

use crate::models::Candidate;
use chrono::NaiveDate;

/// Deterministic candidates dated on `center_date`, covering every category.
///
/// URLs point at `example.com` and are never requested.
pub fn demo_candidates(center_date: NaiveDate) -> Vec<Candidate> {
    let published = center_date.format("%Y-%m-%dT09:00:00+09:00").to_string();
    [
        ("열연(HRC) 유통가격 3주 연속 상승…후판 가격 협상 난항", "steel-hrc"),
        ("미국 철강 관세 232조 확대 검토, 국내 철강업계 긴장", "steel-tariff"),
        ("포스코 광양제철소 3고로 개수 완료…조업 정상화", "posco-gwangyang"),
        ("포스코퓨처엠, 양극재 CAPEX 조정 발표", "posco-futurem"),
        ("제철소 설비 예지보전에 AI 도입…정비 로봇 실증 착수", "maint-pdm"),
        ("드론·비전검사로 고로 설비 점검 자동화", "maint-drone"),
        ("제조업 사무 자동화 확산, 생산성 지표 개선", "supplemental-office"),
    ]
    .into_iter()
    .map(|(title, slug)| {
        Candidate::new(
            title,
            format!("https://example.com/demo/{}/{slug}", center_date.format("%Y%m%d")),
            Some(published.clone()),
        )
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_candidates_are_deterministic() {
        let d = NaiveDate::from_ymd_opt(2025, 9, 26).unwrap();
        let a = demo_candidates(d);
        let b = demo_candidates(d);
        assert_eq!(a, b);
        assert_eq!(a.len(), 7);
        assert!(a.iter().all(|c| c.source == "example.com"));
        assert_eq!(a[0].published_at.as_deref(), Some("2025-09-26T09:00:00+09:00"));
    }
}
