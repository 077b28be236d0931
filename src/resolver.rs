//! Import specifier resolution.
//!
//! Resolves a relative specifier against the file index the way a bundler
//! would on a case-insensitive file system: the literal path first, then each
//! recognized extension, then the directory `index` convention. Matching is
//! exact apart from letter case; there is no fuzzy or prefix search.

use crate::scanner::{FileEntry, FileIndex, SOURCE_EXTENSIONS};

/// How a specifier reached its target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveKind {
    /// The specifier names the file itself, with or without extension.
    Direct,
    /// The specifier names a directory that holds an `index` file.
    DirectoryIndex,
}

/// A successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub entry: &'a FileEntry,
    pub kind: ResolveKind,
}

/// Outcome of resolving one specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// Package import such as `react`; intentionally not resolved.
    External,
    /// Relative import with no matching indexed file.
    NotFound,
    Found(Resolution<'a>),
}

/// Returns true for specifiers that start with a relative-path marker.
pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with('.')
}

/// Resolves `specifier` as written in the file at `current_file` (relative
/// to the scan root, `/`-separated).
///
/// Lookup order:
/// 1. `target`, then `target.jsx`, `.js`, `.tsx`, `.ts`
/// 2. `target/index.jsx`, `.js`, `.tsx`, `.ts`
///
/// The first hit wins.
pub fn resolve<'a>(specifier: &str, current_file: &str, index: &'a FileIndex) -> Resolved<'a> {
    if !is_relative(specifier) {
        return Resolved::External;
    }

    let target = join_relative(parent_dir(current_file), specifier);

    let direct = std::iter::once(target.clone())
        .chain(SOURCE_EXTENSIONS.iter().map(|ext| format!("{}.{}", target, ext)));
    if let Some(entry) = direct.filter_map(|p| index.get(&p)).next() {
        return Resolved::Found(Resolution {
            entry,
            kind: ResolveKind::Direct,
        });
    }

    let index_base = if target.is_empty() {
        "index".to_string()
    } else {
        format!("{}/index", target)
    };
    SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| index.get(&format!("{}.{}", index_base, ext)))
        .map_or(Resolved::NotFound, |entry| {
            Resolved::Found(Resolution {
                entry,
                kind: ResolveKind::DirectoryIndex,
            })
        })
}

/// Returns the directory part of a `/`-separated relative path (`""` at the root).
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Joins `specifier` onto `base_dir` and normalizes `.` and `..` segments.
///
/// `..` segments that climb above the root are kept, so they can never match
/// an indexed file.
pub fn join_relative(base_dir: &str, specifier: &str) -> String {
    let mut parts: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();

    for segment in specifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::tests::index_of;

    fn found<'a>(resolved: Resolved<'a>) -> Resolution<'a> {
        match resolved {
            Resolved::Found(r) => r,
            other => panic!("expected a resolution, got {:?}", other),
        }
    }

    #[test]
    fn join_relative_normalizes_segments() {
        assert_eq!(join_relative("pages", "./Home"), "pages/Home");
        assert_eq!(join_relative("pages", "../components/Button"), "components/Button");
        assert_eq!(join_relative("a/b/c", "../../x/./y"), "a/x/y");
        assert_eq!(join_relative("", "./utils"), "utils");
        assert_eq!(join_relative("", "../outside"), "../outside");
        assert_eq!(join_relative("a", "../../x"), "../x");
        assert_eq!(join_relative("a", "./"), "a");
    }

    #[test]
    fn parent_dir_of_root_file_is_empty() {
        assert_eq!(parent_dir("App.tsx"), "");
        assert_eq!(parent_dir("pages/admin/Home.tsx"), "pages/admin");
    }

    #[test]
    fn package_imports_are_external() {
        let index = index_of(&["react.js"]);
        assert_eq!(resolve("react", "App.tsx", &index), Resolved::External);
        assert_eq!(resolve("@scope/pkg", "App.tsx", &index), Resolved::External);
    }

    #[test]
    fn missing_relative_import_is_not_found() {
        let index = index_of(&["components/Button.tsx"]);
        assert_eq!(resolve("./missing", "App.tsx", &index), Resolved::NotFound);
    }

    #[test]
    fn resolves_case_insensitively_across_directories() {
        let index = index_of(&["components/Button.tsx", "pages/Home.tsx"]);
        let r = found(resolve("../Components/button", "pages/Home.tsx", &index));
        assert_eq!(r.entry.actual_path, "components/Button.tsx");
        assert_eq!(r.kind, ResolveKind::Direct);

        // `./Components` from `pages/` means `pages/Components`.
        assert_eq!(
            resolve("./Components/button", "pages/Home.tsx", &index),
            Resolved::NotFound
        );
    }

    #[test]
    fn resolves_literal_path_with_extension() {
        let index = index_of(&["lib/api.js"]);
        let r = found(resolve("../LIB/Api.js", "pages/Home.tsx", &index));
        assert_eq!(r.entry.actual_path, "lib/api.js");
        assert_eq!(r.kind, ResolveKind::Direct);
    }

    #[test]
    fn extension_priority_prefers_jsx_then_js_then_tsx_then_ts() {
        let index = index_of(&["Card.ts", "Card.tsx", "Card.js"]);
        let r = found(resolve("./card", "App.tsx", &index));
        assert_eq!(r.entry.actual_path, "Card.js");

        let index = index_of(&["Card.ts", "Card.tsx"]);
        let r = found(resolve("./card", "App.tsx", &index));
        assert_eq!(r.entry.actual_path, "Card.tsx");
    }

    #[test]
    fn falls_back_to_directory_index() {
        let index = index_of(&["utils/index.ts", "App.tsx"]);
        let r = found(resolve("./Utils", "App.tsx", &index));
        assert_eq!(r.entry.actual_path, "utils/index.ts");
        assert_eq!(r.kind, ResolveKind::DirectoryIndex);
    }

    #[test]
    fn sibling_file_beats_directory_index() {
        let index = index_of(&["utils.js", "utils/index.ts"]);
        let r = found(resolve("./utils", "App.tsx", &index));
        assert_eq!(r.entry.actual_path, "utils.js");
        assert_eq!(r.kind, ResolveKind::Direct);
    }

    #[test]
    fn dot_specifier_resolves_to_own_directory_index() {
        let index = index_of(&["hooks/index.js", "hooks/useAuth.js"]);
        let r = found(resolve(".", "hooks/useAuth.js", &index));
        assert_eq!(r.entry.actual_path, "hooks/index.js");

        let index = index_of(&["index.ts", "App.tsx"]);
        let r = found(resolve(".", "App.tsx", &index));
        assert_eq!(r.entry.actual_path, "index.ts");
    }
}
