//! External links shown on the site (`label, url` per line)

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{BuildError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// Parse link lines, skipping blanks, `#` comments and lines without a comma
pub fn parse_links(text: &str) -> Vec<Link> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once(','))
        .map(|(label, url)| Link { label: label.trim().to_string(), url: url.trim().to_string() })
        .collect()
}

/// Load the links file; a missing file means no links
pub fn load_links(path: &Path) -> Result<Vec<Link>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
    Ok(parse_links(&text))
}
