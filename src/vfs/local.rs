//! File tree backed by the local file system

use super::{FileTree, TreeEntry};
use std::fs;
use std::io;
use std::path::Path;

/// The real disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTree;

impl LocalTree {
    pub fn new() -> Self {
        Self
    }
}

impl FileTree for LocalTree {
    fn list(&self, dir: &Path) -> io::Result<Vec<TreeEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            // Follows symlinks, so a link to a directory is listed as one
            let is_dir = entry.path().is_dir();
            entries.push(TreeEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        Ok(entries)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn remove_file(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_marks_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("projects")).unwrap();
        fs::write(temp.path().join("notes.txt"), "hello").unwrap();

        let tree = LocalTree::new();
        let mut entries = tree.list(temp.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(
            entries,
            vec![TreeEntry::file("notes.txt"), TreeEntry::dir("projects")]
        );
    }

    #[test]
    fn test_write_read_remove() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.md");
        let mut tree = LocalTree::new();

        tree.write(&path, b"# title").unwrap();
        assert!(tree.exists(&path));
        assert!(!tree.is_dir(&path));
        assert_eq!(tree.read(&path).unwrap(), b"# title");

        tree.remove_file(&path).unwrap();
        assert!(!tree.exists(&path));
    }
}
