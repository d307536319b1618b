//! File classification by extension

use super::extract;
use super::ContextEntry;
use crate::utils::errors::BrainError;
use crate::utils::path::extension_of;
use crate::vfs::FileTree;
use crate::Result;
use std::path::Path;

/// What a file is, as far as the context pipeline cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Plain text read as UTF-8
    Text,
    /// PDF whose page text is extracted
    Pdf,
    /// Bitmap image loaded lazily
    Image,
    /// Word-processor document, listed only
    Document,
    /// Anything else; invisible to the context
    Unsupported,
}

/// Extension (lowercase, no dot) to kind
const EXTENSION_TABLE: &[(&str, FileKind)] = &[
    ("txt", FileKind::Text),
    ("md", FileKind::Text),
    ("pdf", FileKind::Pdf),
    ("png", FileKind::Image),
    ("jpg", FileKind::Image),
    ("jpeg", FileKind::Image),
    ("doc", FileKind::Document),
    ("docx", FileKind::Document),
];

impl FileKind {
    /// Look up the kind for a path's extension (case-insensitive)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        extension_of(path)
            .and_then(|ext| {
                EXTENSION_TABLE
                    .iter()
                    .find(|(known, _)| *known == ext)
                    .map(|(_, kind)| *kind)
            })
            .unwrap_or(FileKind::Unsupported)
    }

    /// Every extension the context pipeline ingests
    pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
        EXTENSION_TABLE.iter().map(|(ext, _)| *ext)
    }
}

/// Classify the file at `location` into a context entry.
///
/// `Ok(None)` means the file type is unsupported. Read and parse failures are
/// returned as errors for the caller to log.
pub fn classify(tree: &dyn FileTree, location: &Path, relative: &str) -> Result<Option<ContextEntry>> {
    let path = relative.to_string();
    let entry = match FileKind::from_path(location) {
        FileKind::Text => {
            let bytes = read(tree, location)?;
            ContextEntry::Text {
                content: extract::plain_text(relative, bytes)?,
                path,
            }
        }
        FileKind::Pdf => {
            let bytes = read(tree, location)?;
            ContextEntry::Text {
                content: extract::pdf_text(relative, &bytes)?,
                path,
            }
        }
        FileKind::Image => ContextEntry::Image {
            path,
            location: location.to_path_buf(),
        },
        FileKind::Document => ContextEntry::Document { path },
        FileKind::Unsupported => return Ok(None),
    };
    Ok(Some(entry))
}

fn read(tree: &dyn FileTree, location: &Path) -> Result<Vec<u8>> {
    tree.read(location)
        .map_err(|e| BrainError::file_system(location, e))
}
