//! Source tree scanner and file index.
//!
//! Recursively walks a source root to collect script files (`.jsx`, `.js`,
//! `.tsx`, `.ts`), pruning dependency caches, VCS metadata and build output.
//! The collected files are keyed by their lower-cased, forward-slash relative
//! path so imports can be matched case-insensitively while the true on-disk
//! casing is kept alongside.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recognized source extensions, in resolution priority order.
pub const SOURCE_EXTENSIONS: [&str; 4] = ["jsx", "js", "tsx", "ts"];

/// Directory names whose subtrees are never visited.
pub const EXCLUDED_DIRS: [&str; 3] = ["node_modules", ".git", "dist"];

/// An indexed source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Lower-cased relative path, the case-insensitive identity.
    pub key: String,
    /// Relative path with true on-disk casing and `/` separators.
    pub actual_path: String,
    /// Path as yielded by the walk, rooted at the scan root.
    pub full_path: PathBuf,
    /// Bare file name, e.g. `Button.tsx`.
    pub file_name: String,
}

/// Case-insensitive lookup table over every indexed source file.
#[derive(Debug, Default, Clone)]
pub struct FileIndex {
    entries: HashMap<String, FileEntry>,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry under its normalized key. Last write wins.
    pub fn insert(&mut self, entry: FileEntry) {
        self.entries.insert(entry.key.clone(), entry);
    }

    /// Looks up a relative path, ignoring case.
    pub fn get(&self, relative_path: &str) -> Option<&FileEntry> {
        self.entries.get(&normalize_key(relative_path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.values()
    }
}

/// Normalizes a relative path into an index key.
pub fn normalize_key(relative_path: &str) -> String {
    relative_path.to_lowercase()
}

/// Controls which entries a walk prunes.
///
/// The fixed [`EXCLUDED_DIRS`] always apply to directories. Extra glob
/// patterns are matched against the bare name of any directory or file.
#[derive(Debug, Default, Clone)]
pub struct ScanFilter {
    patterns: Vec<glob::Pattern>,
}

impl ScanFilter {
    /// Compiles extra exclusion globs (e.g. `"__tests__"`, `"*.stories.tsx"`).
    pub fn from_globs(globs: &[String]) -> Result<Self> {
        let patterns = globs
            .iter()
            .map(|g| {
                glob::Pattern::new(g).with_context(|| format!("Invalid exclude pattern '{}'", g))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    fn is_pruned(&self, entry: &walkdir::DirEntry) -> bool {
        let Some(name) = entry.file_name().to_str() else {
            return false;
        };
        if entry.file_type().is_dir() && EXCLUDED_DIRS.contains(&name) {
            return true;
        }
        self.patterns.iter().any(|p| p.matches(name))
    }
}

/// Returns true if the path carries one of the [`SOURCE_EXTENSIONS`].
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Collects all source files under `root` in walk order.
///
/// Excluded directories are pruned so nothing beneath them is visited. Any
/// traversal error, including a missing root, is returned as-is.
pub fn collect_source_files(root: &Path, filter: &ScanFilter) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !filter.is_pruned(e))
    {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if entry.file_type().is_file() && is_source_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Builds the case-insensitive file index for `root`.
pub fn build_index(root: &Path, filter: &ScanFilter) -> Result<FileIndex> {
    let mut index = FileIndex::new();

    for path in collect_source_files(root, filter)? {
        let actual_path = relative_slash_path(root, &path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        index.insert(FileEntry {
            key: normalize_key(&actual_path),
            actual_path,
            full_path: path,
            file_name,
        });
    }

    Ok(index)
}

/// Renders `path` relative to `root` with `/` separators on every host.
pub fn relative_slash_path(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .with_context(|| format!("{} is not under {}", path.display(), root.display()))?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Creates a temp tree with the given relative files, each holding `contents`.
    pub(crate) fn make_tree(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (rel, contents) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
        dir
    }

    pub(crate) fn index_of(paths: &[&str]) -> FileIndex {
        let mut index = FileIndex::new();
        for p in paths {
            index.insert(FileEntry {
                key: normalize_key(p),
                actual_path: p.to_string(),
                full_path: PathBuf::from(p),
                file_name: p.rsplit('/').next().unwrap().to_string(),
            });
        }
        index
    }

    #[test]
    fn recognizes_source_extensions() {
        assert!(is_source_file(Path::new("a/Button.tsx")));
        assert!(is_source_file(Path::new("a/util.js")));
        assert!(!is_source_file(Path::new("a/styles.css")));
        assert!(!is_source_file(Path::new("a/Button.TSX")));
        assert!(!is_source_file(Path::new("Makefile")));
    }

    #[test]
    fn index_keys_are_lowercase_and_keep_true_case() {
        let tree = make_tree(&[("components/Button.tsx", ""), ("App.jsx", "")]);
        let index = build_index(tree.path(), &ScanFilter::default()).unwrap();

        assert_eq!(index.len(), 2);
        let entry = index.get("COMPONENTS/button.TSX").unwrap();
        assert_eq!(entry.key, "components/button.tsx");
        assert_eq!(entry.actual_path, "components/Button.tsx");
        assert_eq!(entry.file_name, "Button.tsx");
        assert!(entry.full_path.ends_with("components/Button.tsx"));
    }

    #[test]
    fn skips_unrecognized_files() {
        let tree = make_tree(&[("index.ts", ""), ("README.md", ""), ("logo.svg", "")]);
        let index = build_index(tree.path(), &ScanFilter::default()).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.get("index.ts").is_some());
    }

    #[test]
    fn prunes_excluded_directories_at_any_depth() {
        let tree = make_tree(&[
            ("main.ts", ""),
            ("node_modules/react/index.js", ""),
            ("features/node_modules/dep.js", ""),
            ("features/.git/hook.js", ""),
            ("packages/ui/dist/bundle.js", ""),
            ("packages/ui/src/Card.tsx", ""),
        ]);
        let files = collect_source_files(tree.path(), &ScanFilter::default()).unwrap();
        let mut rels: Vec<_> = files
            .iter()
            .map(|f| relative_slash_path(tree.path(), f).unwrap())
            .collect();
        rels.sort();
        assert_eq!(rels, vec!["main.ts", "packages/ui/src/Card.tsx"]);
    }

    #[test]
    fn file_named_like_excluded_dir_is_kept() {
        let tree = make_tree(&[("dist.js", "")]);
        let files = collect_source_files(tree.path(), &ScanFilter::default()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn extra_globs_prune_dirs_and_files() {
        let tree = make_tree(&[
            ("Card.tsx", ""),
            ("Card.stories.tsx", ""),
            ("__tests__/Card.test.tsx", ""),
        ]);
        let filter =
            ScanFilter::from_globs(&["*.stories.tsx".to_string(), "__tests__".to_string()])
                .unwrap();
        let index = build_index(tree.path(), &filter).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.get("card.tsx").is_some());
    }

    #[test]
    fn invalid_glob_is_rejected() {
        let err = ScanFilter::from_globs(&["[".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Invalid exclude pattern"));
    }

    #[test]
    fn missing_root_is_an_error() {
        let tree = make_tree(&[]);
        let missing = tree.path().join("nope");
        assert!(build_index(&missing, &ScanFilter::default()).is_err());
    }
}
