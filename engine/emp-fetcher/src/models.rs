use std::path::PathBuf;

/// What happened to one source URL during a sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Downloaded and written to the cache
    Fetched { game_id: u64, path: PathBuf },

    /// Already cached; no request made
    Cached { game_id: u64, path: PathBuf },

    /// Source line without a usable game id
    Skipped { url: String, reason: String },

    /// Request or write failed; the URL is retried on the next run
    Failed { game_id: u64, url: String, error: String },
}

/// Per-URL outcomes of one sync, in source-list order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub outcomes: Vec<FetchOutcome>,
}

impl FetchReport {
    pub fn push(&mut self, outcome: FetchOutcome) {
        self.outcomes.push(outcome);
    }

    /// Paths of feeds downloaded in this sync
    pub fn fetched(&self) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FetchOutcome::Fetched { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn cached_count(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, FetchOutcome::Cached { .. })).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, FetchOutcome::Skipped { .. })).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, FetchOutcome::Failed { .. })).count()
    }

    pub fn has_new_feeds(&self) -> bool {
        self.outcomes.iter().any(|o| matches!(o, FetchOutcome::Fetched { .. }))
    }
}
