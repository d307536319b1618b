//! Scans a directory into a context list

use super::{classify, ContextEntry};
use crate::utils::errors::BrainError;
use crate::utils::path::Sandbox;
use crate::vfs::FileTree;
use crate::Result;
use std::path::Path;
use tracing::{debug, error};

/// Build the context list for `dir`.
///
/// Subdirectories become directory entries; files go through the classifier.
/// A file that fails to classify is logged and left out. Only a failure to
/// list `dir` itself is returned.
pub fn build_context(tree: &dyn FileTree, sandbox: &Sandbox, dir: &Path) -> Result<Vec<ContextEntry>> {
    let children = tree
        .list(dir)
        .map_err(|e| BrainError::file_system(dir, e))?;

    let mut entries = Vec::with_capacity(children.len());
    for child in children {
        let location = dir.join(&child.name);
        let relative = sandbox.relative(&location);

        if child.is_dir {
            entries.push(ContextEntry::Directory {
                name: child.name,
                path: relative,
            });
            continue;
        }

        match classify(tree, &location, &relative) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(e) => error!("Error processing file {}: {}", location.display(), e),
        }
    }

    debug!(dir = %sandbox.relative(dir), entries = entries.len(), "Updated context: {:?}", entries);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EntryKind;
    use crate::vfs::MemoryTree;

    fn sample_tree() -> MemoryTree {
        MemoryTree::new()
            .with_file("/brain/notes.txt", "hello world")
            .with_dir("/brain/projects")
            .with_file("/brain/projects/plan.md", "# plan")
            .with_file("/brain/cat.png", [0u8; 4])
            .with_file("/brain/cv.docx", "binary")
            .with_file("/brain/script.py", "print('hi')")
            .with_file("/brain/broken.pdf", "not a pdf")
    }

    #[test]
    fn test_build_context_classifies_children() {
        let tree = sample_tree();
        let sandbox = Sandbox::new("/brain");
        let entries = build_context(&tree, &sandbox, Path::new("/brain")).unwrap();

        let kinds: Vec<(EntryKind, &str)> = entries.iter().map(|e| (e.kind(), e.path())).collect();
        assert_eq!(
            kinds,
            vec![
                (EntryKind::Image, "cat.png"),
                (EntryKind::Document, "cv.docx"),
                (EntryKind::Text, "notes.txt"),
                (EntryKind::Directory, "projects"),
            ]
        );
    }

    #[test]
    fn test_nested_paths_are_relative_to_root() {
        let tree = sample_tree();
        let sandbox = Sandbox::new("/brain");
        let entries = build_context(&tree, &sandbox, Path::new("/brain/projects")).unwrap();

        assert_eq!(
            entries,
            vec![ContextEntry::Text {
                path: "projects/plan.md".to_string(),
                content: "# plan".to_string(),
            }]
        );
    }

    #[test]
    fn test_directory_entry_carries_name_and_path() {
        let tree = MemoryTree::new().with_dir("/brain/a/deep");
        let sandbox = Sandbox::new("/brain");
        let entries = build_context(&tree, &sandbox, Path::new("/brain/a")).unwrap();
        assert_eq!(
            entries,
            vec![ContextEntry::Directory {
                name: "deep".to_string(),
                path: "a/deep".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let tree = MemoryTree::new();
        let sandbox = Sandbox::new("/brain");
        assert!(build_context(&tree, &sandbox, Path::new("/brain")).is_err());
    }
}
