//! Dated JSON output.
//!
//! # Output Structure
//!
//! ```text
//! docs/data/
//! ├── 2025-09-25.json
//! └── 2025-09-26.json
//! ```
//!
//! Each file is a pretty-printed JSON array of cards. An existing file is
//! never overwritten: its presence is what makes a re-run a no-op.

use crate::error::NewsError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument, warn};

/// Whether the dated output for this run already exists.
pub async fn output_exists(path: &Path) -> Result<bool, NewsError> {
    Ok(fs::try_exists(path).await?)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `cards` to `path` as a JSON array.
///
/// The document goes to a sibling `.tmp` file first and is renamed into
/// place, so an interrupted run never leaves a truncated dated file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_cards<T: Serialize>(path: &Path, cards: &[T]) -> Result<(), NewsError> {
    let json = serde_json::to_string_pretty(cards)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    let tmp = temp_path(path);
    fs::write(&tmp, json.as_bytes()).await?;
    if let Err(e) = fs::rename(&tmp, path).await {
        if let Err(cleanup) = fs::remove_file(&tmp).await {
            warn!(tmp = %tmp.display(), error = %cleanup, "Failed to remove temp file");
        }
        return Err(e.into());
    }

    info!(cards = cards.len(), bytes = json.len(), "Wrote JSON output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SummaryCard;

    fn card() -> SummaryCard {
        SummaryCard {
            category: "철강경제".into(),
            title: "열연 가격 반등".into(),
            source: "hankyung.com".into(),
            url: "https://www.hankyung.com/article/1".into(),
            date: "2025-09-26".into(),
            points: vec!["- 요약".into()],
            insight: "☞ 시사점".into(),
        }
    }

    #[tokio::test]
    async fn test_write_creates_dir_and_keeps_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs").join("data").join("2025-09-26.json");
        assert!(!output_exists(&path).await.unwrap());

        write_cards(&path, &[card()]).await.unwrap();

        assert!(output_exists(&path).await.unwrap());
        assert!(!temp_path(&path).exists());
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("열연 가격 반등"));
        assert!(raw.contains("\n  {"));
        let back: Vec<SummaryCard> = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, vec![card()]);
    }

    #[tokio::test]
    async fn test_write_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2025-09-26.json");
        write_cards::<SummaryCard>(&path, &[]).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_temp_path_is_sibling() {
        assert_eq!(
            temp_path(Path::new("docs/data/2025-09-26.json")),
            PathBuf::from("docs/data/2025-09-26.json.tmp")
        );
    }
}
