//! Case-insensitive regex search over the context list

use super::ContextEntry;
use crate::Result;
use regex::RegexBuilder;

/// Paths of entries matching `query`.
///
/// Text entries match on their content; images and documents match on their
/// path. Directories never match.
pub fn search_context(query: &str, entries: &[ContextEntry]) -> Result<Vec<String>> {
    let pattern = RegexBuilder::new(query).case_insensitive(true).build()?;

    let results = entries
        .iter()
        .filter(|entry| match entry {
            ContextEntry::Text { content, .. } => pattern.is_match(content),
            ContextEntry::Image { path, .. } | ContextEntry::Document { path } => {
                pattern.is_match(path)
            }
            ContextEntry::Directory { .. } => false,
        })
        .map(|entry| entry.path().to_string())
        .collect();
    Ok(results)
}
