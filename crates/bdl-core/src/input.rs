//! URL list input (e.g. `links.txt`): one URL per line, blank lines ignored.

use anyhow::{Context, Result};
use std::path::Path;

/// Splits `text` into URLs in order, trimming each line and dropping blank ones.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads and parses a URL list file.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read URL list {}", path.display()))?;
    Ok(parse_url_list(&text))
}
