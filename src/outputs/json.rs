//! JSON export of the feed.

use crate::error::FeedError;
use crate::models::FeedSnapshot;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `snapshot` to `{json_output_dir}/{date}/feed_{HHMMSS}.json`.
///
/// Creates the date directory if needed and returns the written path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_feed(
    snapshot: &FeedSnapshot,
    json_output_dir: &str,
) -> Result<String, FeedError> {
    let json = serde_json::to_string_pretty(snapshot)?;

    let full_json_dir = format!(
        "{}/{}",
        json_output_dir.trim_end_matches('/'),
        snapshot.local_date
    );
    info!(%full_json_dir, "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let stamp: String = snapshot
        .local_time
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(6)
        .collect();
    let output_json_filename = format!("{}/feed_{}.json", full_json_dir, stamp);

    fs::write(&output_json_filename, json).await?;
    info!(
        path = %output_json_filename,
        articles = snapshot.articles.len(),
        "Wrote feed JSON"
    );
    Ok(output_json_filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, IdSource};

    #[tokio::test]
    async fn test_write_feed_round_trips() {
        let dir = std::env::temp_dir().join(format!("gazeta_feed_json_{}", std::process::id()));
        let dir = dir.to_str().unwrap().to_string();

        let snapshot = FeedSnapshot {
            local_date: "2026-10-18".to_string(),
            local_time: "09:15:07".to_string(),
            pages_loaded: 1,
            articles: vec![Article {
                id: 7,
                title: "A".to_string(),
                banner: "/x.jpg".to_string(),
                content: "<b>hi</b>".to_string(),
                id_source: IdSource::Upstream,
            }],
        };

        let path = write_feed(&snapshot, &dir).await.unwrap();
        assert!(path.ends_with("2026-10-18/feed_091507.json"));

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: FeedSnapshot = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.articles, snapshot.articles);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
