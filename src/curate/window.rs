//! Recency window: keep items published in the three days ending with the
//! center date.
//!
//! Window is `[center - 2 days 00:00, center + 1 day 00:00)` in wall-clock
//! time of the run's fixed offset. Timestamps carrying an offset are
//! converted into that offset first; naive timestamps are taken as-is.
//! Anything unparseable is kept.

use crate::models::Candidate;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, info, instrument};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M",
    "%a, %d %b %Y %H:%M:%S",
];

/// Parse a feed timestamp into local wall-clock time.
pub fn parse_published(raw: &str, offset: &FixedOffset) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let with_offset = DateTime::parse_from_rfc2822(raw).or_else(|_| DateTime::parse_from_rfc3339(raw));
    if let Ok(dt) = with_offset {
        return Some(dt.with_timezone(offset).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// `(start, end)` bounds of the window for `center`.
pub fn window_bounds(center: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let midnight = center.and_time(NaiveTime::MIN);
    (midnight - Duration::days(2), midnight + Duration::days(1))
}

/// Whether a single timestamp is kept. Unparseable or missing timestamps are.
pub fn in_window(published_at: Option<&str>, center: NaiveDate, offset: &FixedOffset) -> bool {
    let Some(t) = published_at.and_then(|raw| parse_published(raw, offset)) else {
        return true;
    };
    let (start, end) = window_bounds(center);
    start <= t && t < end
}

/// Keep candidates inside the window, preserving order.
#[instrument(level = "info", skip_all, fields(%center))]
pub fn retain_recent(candidates: Vec<Candidate>, center: NaiveDate, offset: &FixedOffset) -> Vec<Candidate> {
    let before = candidates.len();
    let kept: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| {
            let keep = in_window(c.published_at.as_deref(), center, offset);
            if !keep {
                debug!(title = %c.title, published_at = ?c.published_at, "Outside recency window");
            }
            keep
        })
        .collect();
    info!(before, after = kept.len(), "Applied recency window");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn center() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 26).unwrap()
    }

    #[test]
    fn test_window_boundaries() {
        let off = kst();
        assert!(in_window(Some("2025-09-24T00:00:00"), center(), &off));
        assert!(!in_window(Some("2025-09-23T23:59:59"), center(), &off));
        assert!(!in_window(Some("2025-09-27T00:00:00"), center(), &off));
        assert!(in_window(Some("2025-09-26T23:59:59"), center(), &off));
    }

    #[test]
    fn test_unparseable_is_retained() {
        let off = kst();
        assert!(in_window(Some("어제 오후"), center(), &off));
        assert!(in_window(Some(""), center(), &off));
        assert!(in_window(None, center(), &off));
    }

    #[test]
    fn test_rfc2822_converted_to_run_offset() {
        let off = kst();
        // 15:30 UTC on the 23rd is 00:30 on the 24th in UTC+9.
        assert!(in_window(Some("Tue, 23 Sep 2025 15:30:00 +0000"), center(), &off));
        assert!(in_window(Some("Fri, 26 Sep 2025 09:10:00 +0900"), center(), &off));
        assert!(!in_window(Some("Sat, 27 Sep 2025 00:00:00 +0900"), center(), &off));
    }

    #[test]
    fn test_other_formats() {
        let off = kst();
        assert_eq!(
            parse_published("2025-09-25", &off),
            NaiveDate::from_ymd_opt(2025, 9, 25).unwrap().and_hms_opt(0, 0, 0)
        );
        assert!(parse_published("2025-09-25T08:00:00+09:00", &off).is_some());
        assert!(parse_published("2025.09.25 08:00", &off).is_some());
    }

    #[test]
    fn test_retain_recent_keeps_order() {
        let items = vec![
            Candidate::new("a", "https://e.com/a", Some("2025-09-26T10:00:00".into())),
            Candidate::new("b", "https://e.com/b", Some("2025-09-20T10:00:00".into())),
            Candidate::new("c", "https://e.com/c", None),
            Candidate::new("d", "https://e.com/d", Some("2025-09-25T10:00:00".into())),
        ];
        let kept = retain_recent(items, center(), &kst());
        let titles: Vec<&str> = kept.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c", "d"]);
    }
}
