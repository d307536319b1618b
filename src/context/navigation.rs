//! Keyword-overlap navigation hints

use super::ContextEntry;
use crate::utils::text::word_tokens;

/// Suggest shell commands for entries whose name or path shares a word with `query`.
///
/// Directories are matched on their name and suggested as `cd <name>`; files
/// are matched on their relative path and suggested for examination. File
/// contents are not scanned. Suggestions keep context order.
pub fn suggest_navigation(query: &str, entries: &[ContextEntry]) -> Vec<String> {
    let query_words = word_tokens(query);
    if query_words.is_empty() {
        return Vec::new();
    }

    entries
        .iter()
        .filter_map(|entry| match entry {
            ContextEntry::Directory { name, .. } => {
                let overlaps = !word_tokens(name).is_disjoint(&query_words);
                overlaps.then(|| format!("cd {}", name))
            }
            ContextEntry::Text { path, .. }
            | ContextEntry::Image { path, .. }
            | ContextEntry::Document { path } => {
                let overlaps = !word_tokens(path).is_disjoint(&query_words);
                overlaps.then(|| format!("Examine the file: {}", path))
            }
        })
        .collect()
}
