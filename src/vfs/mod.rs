//! File tree abstraction used by the session and the context pipeline
//!
//! Everything that touches the brain goes through [`FileTree`], so the whole
//! navigation and context-assembly logic can run against the local disk or an
//! in-memory tree without changes.

use std::io;
use std::path::Path;

pub mod local;
pub mod memory;

pub use local::LocalTree;
pub use memory::MemoryTree;

/// One immediate child of a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Base name of the child
    pub name: String,
    /// Whether the child is a directory
    pub is_dir: bool,
}

impl TreeEntry {
    pub fn file<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// File-system capability over absolute paths
pub trait FileTree: Send + Sync {
    /// List the immediate children of `dir`, in the tree's natural order
    fn list(&self, dir: &Path) -> io::Result<Vec<TreeEntry>>;

    /// Whether `path` exists and is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole file at `path`
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or truncate the file at `path` with `contents`
    fn write(&mut self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Remove the file at `path`
    fn remove_file(&mut self, path: &Path) -> io::Result<()>;

    /// Create `path` and any missing parents
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()>;
}
