//! Path utilities and sandbox containment

use std::path::{Component, Path, PathBuf};

/// The fixed root that navigation may never leave
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Create a sandbox rooted at `root`.
    ///
    /// The root is normalized lexically; callers working on the local disk
    /// should pass an already canonicalized path.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: normalize_path(root),
        }
    }

    /// The sandbox root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `requested` against `current` without touching the file system.
    ///
    /// `..` goes to the parent, absolute paths replace `current`, and the
    /// result is normalized.
    pub fn resolve<P: AsRef<Path>>(&self, current: &Path, requested: P) -> PathBuf {
        normalize_path(current.join(requested.as_ref()))
    }

    /// Check if a path is the root or a descendant of it
    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        path.as_ref().starts_with(&self.root)
    }

    /// Render `path` relative to the root, `.` for the root itself
    pub fn relative<P: AsRef<Path>>(&self, path: P) -> String {
        relative_path(path.as_ref(), &self.root)
    }
}

/// Normalize a path lexically: drop `.`, fold `..` into the parent.
///
/// `..` never climbs above the file-system root. Symlinks are not resolved.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            Component::Normal(part) => normalized.push(part),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

/// Render `path` relative to `base` using `..` where needed.
///
/// Both paths are normalized first; the result uses `/` separators and is `.`
/// when the paths are equal.
pub fn relative_path(path: &Path, base: &Path) -> String {
    let path = normalize_path(path);
    let base = normalize_path(base);

    let path_parts: Vec<Component> = path.components().collect();
    let base_parts: Vec<Component> = base.components().collect();
    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..base_parts.len() {
        parts.push("..".to_string());
    }
    for component in &path_parts[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Lowercased extension of a path, if any
pub fn extension_of<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/brain/./a/../b"), PathBuf::from("/brain/b"));
        assert_eq!(normalize_path("/brain/.."), PathBuf::from("/"));
        assert_eq!(normalize_path("/.."), PathBuf::from("/"));
        assert_eq!(normalize_path("/brain/projects/"), PathBuf::from("/brain/projects"));
        assert_eq!(normalize_path("a/../../b"), PathBuf::from("../b"));
    }

    #[test]
    fn test_resolve() {
        let sandbox = Sandbox::new("/brain");
        let current = Path::new("/brain/projects");
        assert_eq!(sandbox.resolve(current, ".."), PathBuf::from("/brain"));
        assert_eq!(sandbox.resolve(current, "rust/async"), PathBuf::from("/brain/projects/rust/async"));
        assert_eq!(sandbox.resolve(current, "/etc"), PathBuf::from("/etc"));
        assert_eq!(sandbox.resolve(current, ""), PathBuf::from("/brain/projects"));
    }

    #[test]
    fn test_contains_is_component_wise() {
        let sandbox = Sandbox::new("/brain");
        assert!(sandbox.contains("/brain"));
        assert!(sandbox.contains("/brain/projects"));
        assert!(!sandbox.contains("/"));
        assert!(!sandbox.contains("/brainstorm"));
    }

    #[test]
    fn test_relative() {
        let sandbox = Sandbox::new("/brain");
        assert_eq!(sandbox.relative("/brain"), ".");
        assert_eq!(sandbox.relative("/brain/projects/plan.md"), "projects/plan.md");
        assert_eq!(sandbox.relative("/elsewhere/x.txt"), "../elsewhere/x.txt");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a/B.PDF"), Some("pdf".to_string()));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".txt"), None);
    }
}
