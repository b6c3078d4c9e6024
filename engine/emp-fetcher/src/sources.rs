//! Source list reader

use std::fs;
use std::path::Path;

use crate::error::{FetchError, Result};

/// Path marker preceding the game id in feed URLs: `.../emp/<id>/...`
const EMP_SEGMENT: &str = "/emp/";

/// One feed URL from the source list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub url: String,
}

impl FeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Game id embedded in the URL; also the raw cache key
    pub fn game_id(&self) -> Result<u64> {
        // Every slash is a candidate start so that `/emp/emp/<id>/` still matches
        self.url
            .match_indices('/')
            .find_map(|(start, _)| {
                let rest = self.url[start..].strip_prefix(EMP_SEGMENT)?;
                let (digits, _) = rest.split_once('/')?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                digits.parse().ok()
            })
            .ok_or_else(|| FetchError::MalformedSource(self.url.clone()))
    }
}

/// Parse source lines, skipping blanks and `#` comments
pub fn parse_sources(text: &str) -> Vec<FeedSource> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(FeedSource::new)
        .collect()
}

/// Read the newline-delimited source list at `path`
pub fn read_sources(path: &Path) -> Result<Vec<FeedSource>> {
    if !path.exists() {
        return Err(FetchError::MissingSources(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|e| FetchError::io(path, e))?;
    Ok(parse_sources(&text))
}
