//! Bounded textual summary of the context list

use super::ContextEntry;
use crate::utils::text::excerpt;
use std::fmt::Write;

/// Characters of each text entry included in the summary
pub const EXCERPT_CHARS: usize = 500;

/// Render the context list for prompting.
///
/// Every entry appears, in context order. Text content is cut to
/// [`EXCERPT_CHARS`] characters and always followed by `...`.
pub fn summarize_context(relative_dir: &str, entries: &[ContextEntry]) -> String {
    let mut summary = format!("Current directory: {}\nContents:\n", relative_dir);
    for entry in entries {
        // Writing to a String cannot fail
        let _ = match entry {
            ContextEntry::Directory { name, .. } => writeln!(summary, "- Directory: {}", name),
            ContextEntry::Text { path, content } => writeln!(
                summary,
                "- File: {}\nContent: {}...",
                path,
                excerpt(content, EXCERPT_CHARS)
            ),
            ContextEntry::Image { path, .. } => writeln!(summary, "- Image: {}", path),
            ContextEntry::Document { path } => writeln!(summary, "- Document: {}", path),
        };
    }
    summary
}
