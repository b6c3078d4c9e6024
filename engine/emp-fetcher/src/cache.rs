//! Append-only raw feed cache
//!
//! Each game is downloaded at most once: if `game_<id>.json` exists in the raw
//! directory the URL is not requested again. Failures are reported per URL and
//! never stop the remaining URLs from being processed.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::client::FeedClient;
use crate::error::{FetchError, Result};
use crate::models::{FetchOutcome, FetchReport};
use crate::sources::FeedSource;
use stats_builder::feed::raw_file_name;

pub struct FetchCache<C: FeedClient> {
    raw_dir: PathBuf,
    client: C,
}

impl<C: FeedClient> FetchCache<C> {
    pub fn new(raw_dir: impl Into<PathBuf>, client: C) -> Self {
        Self { raw_dir: raw_dir.into(), client }
    }

    /// Cache file for `game_id`
    pub fn cache_path(&self, game_id: u64) -> PathBuf {
        self.raw_dir.join(raw_file_name(game_id))
    }

    /// Bring the cache up to date with `sources`, one request at a time
    pub async fn sync(&self, sources: &[FeedSource]) -> Result<FetchReport> {
        fs::create_dir_all(&self.raw_dir).await.map_err(|e| FetchError::io(&self.raw_dir, e))?;

        let mut report = FetchReport::default();
        for source in sources {
            let game_id = match source.game_id() {
                Ok(id) => id,
                Err(e) => {
                    warn!("{}", e);
                    report.push(FetchOutcome::Skipped {
                        url: source.url.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let path = self.cache_path(game_id);
            if path.exists() {
                info!("Skipping game {}; cached feed found at {:?}", game_id, path);
                report.push(FetchOutcome::Cached { game_id, path });
                continue;
            }

            match self.fetch_one(&source.url, &path).await {
                Ok(()) => {
                    info!("Saved game {} -> {:?}", game_id, path);
                    report.push(FetchOutcome::Fetched { game_id, path });
                }
                Err(e) => {
                    warn!("{}", e);
                    report.push(FetchOutcome::Failed {
                        game_id,
                        url: source.url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    async fn fetch_one(&self, url: &str, path: &Path) -> Result<()> {
        let body = self.client.get(url).await?;
        fs::write(path, body).await.map_err(|e| FetchError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// In-memory client that records every requested URL
    #[derive(Default)]
    struct RecordingClient {
        bodies: HashMap<String, Vec<u8>>,
        requests: Mutex<Vec<String>>,
    }

    impl RecordingClient {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.bodies.insert(url.to_string(), body.as_bytes().to_vec());
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FeedClient for RecordingClient {
        async fn get(&self, url: &str) -> Result<Vec<u8>> {
            self.requests.lock().unwrap().push(url.to_string());
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Status { url: url.to_string(), status: 404 })
        }
    }

    const FEED_1: &str = "https://feeds.example/emp/1/game.json";
    const FEED_2: &str = "https://feeds.example/emp/2/game.json";
    const FEED_3: &str = "https://feeds.example/emp/3/game.json";

    fn sources(urls: &[&str]) -> Vec<FeedSource> {
        urls.iter().map(|u| FeedSource::new(*u)).collect()
    }

    #[tokio::test]
    async fn test_fetch_persists_body_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let raw_dir = temp_dir.path().join("data/raw");
        let body = "{\"players\":{\"A\":{\"goals\":2}}}";
        let cache = FetchCache::new(&raw_dir, RecordingClient::default().with(FEED_1, body));

        let report = cache.sync(&sources(&[FEED_1])).await.unwrap();

        assert_eq!(report.fetched(), vec![&raw_dir.join("game_1.json")]);
        assert_eq!(std::fs::read_to_string(raw_dir.join("game_1.json")).unwrap(), body);
    }

    #[tokio::test]
    async fn test_cached_feeds_are_not_requested_again() {
        let temp_dir = TempDir::new().unwrap();
        let client = RecordingClient::default().with(FEED_1, "{}").with(FEED_2, "{}");
        let cache = FetchCache::new(temp_dir.path(), client);
        let list = sources(&[FEED_1, FEED_2]);

        let first = cache.sync(&list).await.unwrap();
        assert_eq!(first.fetched().len(), 2);
        assert_eq!(cache.client.requests().len(), 2);

        let second = cache.sync(&list).await.unwrap();
        assert!(!second.has_new_feeds());
        assert_eq!(second.cached_count(), 2);
        assert_eq!(cache.client.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_existing_file_is_left_untouched() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("game_1.json"), "original").unwrap();
        let client = RecordingClient::default().with(FEED_1, "newer");
        let cache = FetchCache::new(temp_dir.path(), client);

        cache.sync(&sources(&[FEED_1])).await.unwrap();

        assert!(cache.client.requests().is_empty());
        let kept = std::fs::read_to_string(temp_dir.path().join("game_1.json")).unwrap();
        assert_eq!(kept, "original");
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_later_urls() {
        let temp_dir = TempDir::new().unwrap();
        let client = RecordingClient::default().with(FEED_1, "{}").with(FEED_3, "{}");
        let cache = FetchCache::new(temp_dir.path(), client);

        let report = cache
            .sync(&sources(&[FEED_1, "https://feeds.example/no-id", FEED_2, FEED_3]))
            .await
            .unwrap();

        assert_eq!(report.fetched().len(), 2);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(matches!(&report.outcomes[2], FetchOutcome::Failed { game_id: 2, .. }));
        assert!(!temp_dir.path().join("game_2.json").exists());
        assert_eq!(
            cache.client.requests(),
            vec![FEED_1.to_string(), FEED_2.to_string(), FEED_3.to_string()]
        );
    }
}
