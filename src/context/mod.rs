//! Context assembly for the current directory
//!
//! The context list is the ordered set of entries the model sees for the
//! directory being visited. It is always rebuilt wholesale from the file tree.

use serde::Serialize;
use std::path::{Path, PathBuf};

pub mod builder;
pub mod classifier;
pub mod extract;
pub mod images;
pub mod navigation;
pub mod search;
pub mod summary;

pub use builder::build_context;
pub use classifier::{classify, FileKind};
pub use images::load_images;
pub use navigation::suggest_navigation;
pub use search::search_context;
pub use summary::{summarize_context, EXCERPT_CHARS};

/// Kind of a context entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    Text,
    Image,
    Document,
}

/// One classified item visible in the current directory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContextEntry {
    /// A subdirectory
    Directory { name: String, path: String },
    /// A text-bearing file (plain text, markdown, or extracted PDF text)
    Text { path: String, content: String },
    /// An image; pixels are loaded from `location` only when a question is asked
    Image { path: String, location: PathBuf },
    /// A word-processor document, listed but not read
    Document { path: String },
}

impl ContextEntry {
    /// Sandbox-relative path of the entry
    pub fn path(&self) -> &str {
        match self {
            Self::Directory { path, .. }
            | Self::Text { path, .. }
            | Self::Image { path, .. }
            | Self::Document { path } => path,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Directory { .. } => EntryKind::Directory,
            Self::Text { .. } => EntryKind::Text,
            Self::Image { .. } => EntryKind::Image,
            Self::Document { .. } => EntryKind::Document,
        }
    }

    /// Absolute location of an image entry
    pub fn image_location(&self) -> Option<&Path> {
        match self {
            Self::Image { location, .. } => Some(location),
            _ => None,
        }
    }
}

/// Entry counts by kind, for status output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContextStats {
    pub directories: usize,
    pub texts: usize,
    pub images: usize,
    pub documents: usize,
}

impl ContextStats {
    pub fn from_entries(entries: &[ContextEntry]) -> Self {
        let mut stats = Self::default();
        for entry in entries {
            match entry.kind() {
                EntryKind::Directory => stats.directories += 1,
                EntryKind::Text => stats.texts += 1,
                EntryKind::Image => stats.images += 1,
                EntryKind::Document => stats.documents += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.directories + self.texts + self.images + self.documents
    }
}
