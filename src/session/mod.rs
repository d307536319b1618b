//! Navigation state for one shell session
//!
//! A [`Session`] owns the file tree, the sandbox, the current directory and
//! the context list built from it. Every successful navigation or mutation
//! rebuilds the context list from scratch.

use crate::context::{self, ContextEntry, ContextStats};
use crate::utils::errors::BrainError;
use crate::utils::path::Sandbox;
use crate::vfs::{FileTree, LocalTree, TreeEntry};
use crate::Result;
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub struct Session {
    tree: Box<dyn FileTree>,
    sandbox: Sandbox,
    current: PathBuf,
    context: Vec<ContextEntry>,
}

impl Session {
    /// Open a session at `root` on an arbitrary file tree
    pub fn new<P: AsRef<Path>>(tree: Box<dyn FileTree>, root: P) -> Result<Self> {
        let sandbox = Sandbox::new(root);
        if !tree.is_dir(sandbox.root()) {
            return Err(BrainError::not_a_directory(sandbox.root().display().to_string()));
        }

        let current = sandbox.root().to_path_buf();
        let mut session = Self {
            tree,
            sandbox,
            current,
            context: Vec::new(),
        };
        session.refresh();
        Ok(session)
    }

    /// Open a session on the local disk, creating the root when asked to
    pub fn open_local<P: AsRef<Path>>(root: P, create_if_missing: bool) -> Result<Self> {
        let root = root.as_ref();
        let mut tree = LocalTree::new();
        if create_if_missing && !tree.exists(root) {
            tree.create_dir_all(root)
                .map_err(|e| BrainError::file_system(root, e))?;
            info!("Created brain root: {}", root.display());
        }

        let root = root
            .canonicalize()
            .map_err(|e| BrainError::file_system(root, e))?;
        Self::new(Box::new(tree), root)
    }

    pub fn root(&self) -> &Path {
        self.sandbox.root()
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub fn current_path(&self) -> &Path {
        &self.current
    }

    /// Current directory relative to the root, `.` for the root itself
    pub fn relative_current(&self) -> String {
        self.sandbox.relative(&self.current)
    }

    pub fn context(&self) -> &[ContextEntry] {
        &self.context
    }

    pub fn stats(&self) -> ContextStats {
        ContextStats::from_entries(&self.context)
    }

    pub fn tree(&self) -> &dyn FileTree {
        self.tree.as_ref()
    }

    /// Rebuild the context list for the current directory.
    ///
    /// A directory that cannot be listed leaves an empty list behind.
    pub fn refresh(&mut self) {
        self.context = match context::build_context(self.tree.as_ref(), &self.sandbox, &self.current) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Error reading directory {}: {}", self.relative_current(), e);
                Vec::new()
            }
        };
    }

    /// Move to `requested` (relative, `..` or absolute).
    ///
    /// Targets outside the root, missing paths and files are rejected and
    /// leave the session untouched.
    pub fn change_directory(&mut self, requested: &str) -> Result<()> {
        let target = self.sandbox.resolve(&self.current, requested.trim());

        if !self.sandbox.contains(&target) {
            return Err(BrainError::sandbox_violation(self.root().display().to_string()));
        }
        if !self.tree.exists(&target) {
            return Err(BrainError::not_found(format!(
                "directory {}",
                self.sandbox.relative(&target)
            )));
        }
        if !self.tree.is_dir(&target) {
            return Err(BrainError::not_a_directory(self.sandbox.relative(&target)));
        }

        self.current = target;
        info!("Changed directory to: {}", self.relative_current());
        self.refresh();
        Ok(())
    }

    /// Every child of the current directory, supported or not
    pub fn list_directory(&self) -> Result<Vec<TreeEntry>> {
        self.tree
            .list(&self.current)
            .map_err(|e| BrainError::file_system(&self.current, e))
    }

    /// Paths in the context list matching `query`
    pub fn search(&self, query: &str) -> Result<Vec<String>> {
        context::search_context(query, &self.context)
    }

    pub fn summarize(&self) -> String {
        context::summarize_context(&self.relative_current(), &self.context)
    }

    pub fn suggest_navigation(&self, query: &str) -> Vec<String> {
        context::suggest_navigation(query, &self.context)
    }

    /// Decode the image entries of the current directory
    pub fn load_images(&self) -> Vec<RgbImage> {
        context::load_images(self.tree.as_ref(), &self.context)
    }

    /// Names in the current directory starting with `prefix`
    pub fn completions(&self, prefix: &str) -> Vec<String> {
        self.tree
            .list(&self.current)
            .map(|children| {
                children
                    .into_iter()
                    .map(|child| child.name)
                    .filter(|name| name.starts_with(prefix))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Write a new file in the current directory
    pub fn create_file(&mut self, filename: &str, content: &str) -> Result<()> {
        let path = self.file_path(filename)?;
        self.tree
            .write(&path, content.as_bytes())
            .map_err(|e| BrainError::file_system(&path, e).with_context(format!("Error creating file {}", filename)))?;

        info!("File created: {}", self.sandbox.relative(&path));
        self.refresh();
        Ok(())
    }

    /// Overwrite an existing file in the current directory
    pub fn edit_file(&mut self, filename: &str, content: &str) -> Result<()> {
        let path = self.existing_file_path(filename)?;
        self.tree
            .write(&path, content.as_bytes())
            .map_err(|e| BrainError::file_system(&path, e).with_context(format!("Error editing file {}", filename)))?;

        info!("File updated: {}", self.sandbox.relative(&path));
        self.refresh();
        Ok(())
    }

    /// Remove an existing file from the current directory
    pub fn delete_file(&mut self, filename: &str) -> Result<()> {
        let path = self.existing_file_path(filename)?;
        self.tree
            .remove_file(&path)
            .map_err(|e| BrainError::file_system(&path, e).with_context(format!("Error deleting file {}", filename)))?;

        info!("File deleted: {}", self.sandbox.relative(&path));
        self.refresh();
        Ok(())
    }

    // Mutator targets are resolved against the current directory only; the
    // sandbox boundary is enforced by navigation, not here.
    fn file_path(&self, filename: &str) -> Result<PathBuf> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(BrainError::validation("filename", "File name is empty"));
        }
        Ok(self.sandbox.resolve(&self.current, filename))
    }

    fn existing_file_path(&self, filename: &str) -> Result<PathBuf> {
        let path = self.file_path(filename)?;
        if !self.tree.exists(&path) {
            return Err(BrainError::not_found(format!(
                "file {}",
                self.sandbox.relative(&path)
            )));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EntryKind;
    use crate::context::images::tests::png_bytes;
    use crate::vfs::MemoryTree;
    use tempfile::TempDir;

    fn scenario() -> Session {
        let tree = MemoryTree::new()
            .with_file("/brain/notes.txt", "hello world")
            .with_dir("/brain/projects")
            .with_file("/brain/projects/roadmap.md", "ship it");
        Session::new(Box::new(tree), "/brain").unwrap()
    }

    fn listing(session: &Session) -> Vec<String> {
        session
            .list_directory()
            .unwrap()
            .into_iter()
            .map(|entry| entry.name)
            .collect()
    }

    #[test]
    fn test_new_session_starts_at_root() {
        let session = scenario();
        assert_eq!(session.current_path(), Path::new("/brain"));
        assert_eq!(session.relative_current(), ".");
        assert_eq!(session.context().len(), 2);
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let result = Session::new(Box::new(MemoryTree::new()), "/brain");
        assert!(matches!(result, Err(BrainError::NotADirectory { .. })));
    }

    #[test]
    fn test_change_directory_and_back() {
        let mut session = scenario();
        session.change_directory("projects").unwrap();
        assert_eq!(session.relative_current(), "projects");
        assert_eq!(session.context()[0].path(), "projects/roadmap.md");

        session.change_directory("..").unwrap();
        assert_eq!(session.relative_current(), ".");
    }

    #[test]
    fn test_absolute_path_inside_root() {
        let mut session = scenario();
        session.change_directory("/brain/projects").unwrap();
        assert_eq!(session.relative_current(), "projects");
    }

    #[test]
    fn test_leaving_the_root_is_rejected_without_rebuild() {
        let mut session = scenario();
        let before = session.context().to_vec();

        for target in ["..", "../..", "/", "projects/../../etc", "/tmp"] {
            let err = session.change_directory(target).unwrap_err();
            assert!(matches!(err, BrainError::SandboxViolation { .. }), "{}", target);
            assert!(err.is_warning());
            assert_eq!(session.current_path(), Path::new("/brain"));
            assert_eq!(session.context(), before.as_slice());
        }
    }

    #[test]
    fn test_missing_and_file_targets_are_rejected() {
        let mut session = scenario();
        assert!(matches!(
            session.change_directory("nowhere"),
            Err(BrainError::NotFound { .. })
        ));
        assert!(matches!(
            session.change_directory("notes.txt"),
            Err(BrainError::NotADirectory { .. })
        ));
        assert_eq!(session.relative_current(), ".");
    }

    #[test]
    fn test_create_edit_delete_restores_listing() {
        let mut session = scenario();
        let original = listing(&session);

        session.create_file("todo.txt", "buy milk").unwrap();
        assert!(listing(&session).contains(&"todo.txt".to_string()));
        assert!(session.context().iter().any(|e| matches!(
            e,
            ContextEntry::Text { path, content } if path == "todo.txt" && content == "buy milk"
        )));

        session.edit_file("todo.txt", "buy oat milk").unwrap();
        assert_eq!(
            session.tree().read(Path::new("/brain/todo.txt")).unwrap(),
            b"buy oat milk"
        );

        session.delete_file("todo.txt").unwrap();
        assert_eq!(listing(&session), original);
        assert!(!session.context().iter().any(|e| e.path() == "todo.txt"));
    }

    #[test]
    fn test_mutators_resolve_against_current_directory() {
        let mut session = scenario();
        session.change_directory("projects").unwrap();
        session.create_file("ideas.md", "more").unwrap();
        assert!(session.tree().exists(Path::new("/brain/projects/ideas.md")));
        assert!(session.context().iter().any(|e| e.path() == "projects/ideas.md"));
    }

    #[test]
    fn test_edit_and_delete_missing_file_are_warnings() {
        let mut session = scenario();
        let before = session.context().to_vec();

        let err = session.edit_file("ghost.txt", "boo").unwrap_err();
        assert!(err.is_warning());
        let err = session.delete_file("ghost.txt").unwrap_err();
        assert!(err.is_warning());

        assert!(!session.tree().exists(Path::new("/brain/ghost.txt")));
        assert_eq!(session.context(), before.as_slice());
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let mut session = scenario();
        let err = session.create_file("missing/dir.txt", "x").unwrap_err();
        assert!(!err.is_warning());
        assert!(err.to_string().contains("Error creating file missing/dir.txt"));
    }

    #[test]
    fn test_scenario_summary_and_suggestions() {
        let session = scenario();
        assert!(session.suggest_navigation("Tell me about hello").is_empty());

        let summary = session.summarize();
        assert!(summary.starts_with("Current directory: .\nContents:\n"));
        assert!(summary.contains("- File: notes.txt"));
        assert!(summary.contains("hello world..."));
        assert!(summary.contains("- Directory: projects"));

        assert_eq!(session.suggest_navigation("what is in projects?"), vec!["cd projects"]);
    }

    #[test]
    fn test_search_and_completions() {
        let session = scenario();
        assert_eq!(session.search("HELLO").unwrap(), vec!["notes.txt"]);
        assert!(session.search("(").is_err());
        assert_eq!(session.completions("pro"), vec!["projects"]);
        assert_eq!(session.completions("").len(), 2);
    }

    #[test]
    fn test_images_are_loaded_from_context() {
        let tree = MemoryTree::new()
            .with_file("/brain/cat.png", png_bytes(3, 2))
            .with_file("/brain/broken.jpg", "not an image");
        let session = Session::new(Box::new(tree), "/brain").unwrap();

        assert_eq!(session.stats().images, 2);
        let images = session.load_images();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].dimensions(), (3, 2));
        assert_eq!(session.context()[1].kind(), EntryKind::Image);
    }

    #[test]
    fn test_open_local_creates_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("brain");

        assert!(Session::open_local(&root, false).is_err());

        let mut session = Session::open_local(&root, true).unwrap();
        assert!(root.is_dir());
        session.create_file("notes.txt", "hello").unwrap();
        assert_eq!(std::fs::read_to_string(root.join("notes.txt")).unwrap(), "hello");
        assert_eq!(session.context().len(), 1);
    }
}
