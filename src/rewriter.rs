//! Import specifier rewriting.
//!
//! Scans source text for `from '...'` / `from "..."` clauses, resolves each
//! relative specifier and substitutes the canonical specifier where the text
//! differs. The output buffer is rebuilt in a single left-to-right pass:
//! unmatched spans are copied verbatim and only the specifier bytes between
//! the quotes are replaced, so earlier rewrites never shift later matches.

use crate::report::{FixRecord, IssueRecord, REASON_NOT_FOUND};
use crate::resolver::{self, Resolution, ResolveKind, Resolved};
use crate::scanner::{FileIndex, SOURCE_EXTENSIONS};
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static FROM_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bfrom\s+(?:'([^'"]+)'|"([^'"]+)")"#).unwrap());

/// A `from` clause found in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRef {
    /// The specifier between the quotes.
    pub specifier: String,
    /// Byte offset of the first specifier byte.
    pub start: usize,
    /// Byte offset one past the last specifier byte.
    pub end: usize,
    /// Line number, 1-indexed.
    pub line: usize,
}

/// Result of fixing one file's content.
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    pub content: String,
    pub fixes: Vec<FixRecord>,
    pub issues: Vec<IssueRecord>,
}

impl FileOutcome {
    pub fn changed(&self) -> bool {
        !self.fixes.is_empty()
    }
}

/// Extracts every `from` clause in source order.
pub fn scan_imports(source: &str) -> Vec<ImportRef> {
    FROM_CLAUSE
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| ImportRef {
            specifier: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
            line: line_of(source, m.start()),
        })
        .collect()
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

/// Computes the specifier `current_file` should use to reach a resolved target.
///
/// The result is relative to the importing file's directory, uses `/`
/// separators, always starts with `./` or `../`, and has
/// its extension stripped. Directory-index resolutions point at the
/// directory. If that form would resolve to a different file, the explicit
/// path to the target file, extension included, is used instead.
pub fn canonical_specifier(
    current_file: &str,
    resolution: &Resolution,
    index: &FileIndex,
) -> String {
    let from_dir = resolver::parent_dir(current_file);
    let actual = resolution.entry.actual_path.as_str();

    let preferred = match resolution.kind {
        ResolveKind::Direct => strip_extension(&explicit_relative(from_dir, actual)).to_string(),
        ResolveKind::DirectoryIndex => explicit_relative(from_dir, resolver::parent_dir(actual)),
    };

    if resolves_to(&preferred, current_file, index, &resolution.entry.key) {
        preferred
    } else {
        explicit_relative(from_dir, actual)
    }
}

fn resolves_to(specifier: &str, current_file: &str, index: &FileIndex, key: &str) -> bool {
    matches!(
        resolver::resolve(specifier, current_file, index),
        Resolved::Found(r) if r.entry.key == key
    )
}

/// Relative path from `from_dir` to `to_path`, always starting with `./` or
/// `../`. A path ending in `..` (an ancestor directory) gets a trailing `/`.
fn explicit_relative(from_dir: &str, to_path: &str) -> String {
    let rel = relative_path(from_dir, to_path);
    if rel.is_empty() {
        "./".to_string()
    } else if rel == ".." || rel.ends_with("/..") {
        format!("{}/", rel)
    } else if rel.starts_with("../") {
        rel
    } else {
        format!("./{}", rel)
    }
}

/// Relative path between two `/`-separated paths under the same root.
///
/// Segments are compared exactly, as on a case-sensitive file system.
pub fn relative_path(from_dir: &str, to_path: &str) -> String {
    let from: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let to: Vec<&str> = to_path.split('/').filter(|s| !s.is_empty()).collect();

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts = vec![".."; from.len() - common];
    parts.extend(&to[common..]);
    parts.join("/")
}

/// Removes a trailing recognized extension, if any.
pub fn strip_extension(specifier: &str) -> &str {
    SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| {
            specifier
                .strip_suffix(ext)
                .and_then(|rest| rest.strip_suffix('.'))
        })
        .unwrap_or(specifier)
}

/// Fixes every relative import in `source`, which lives at `current_file`
/// relative to the scan root.
///
/// Package imports are left alone. Unresolvable imports become issues and
/// their text is kept. Resolved imports whose text differs from the
/// canonical specifier are rewritten in place, keeping the quote character
/// and any whitespace after `from`.
pub fn fix_source(source: &str, current_file: &str, index: &FileIndex) -> FileOutcome {
    let mut content = String::with_capacity(source.len());
    let mut fixes = Vec::new();
    let mut issues = Vec::new();
    let mut cursor = 0;

    for import in scan_imports(source) {
        match resolver::resolve(&import.specifier, current_file, index) {
            Resolved::External => {}
            Resolved::NotFound => issues.push(IssueRecord {
                file: current_file.to_string(),
                import: import.specifier,
                line: import.line,
                reason: REASON_NOT_FOUND.to_string(),
            }),
            Resolved::Found(resolution) => {
                let correct = canonical_specifier(current_file, &resolution, index);
                if correct != import.specifier {
                    content.push_str(&source[cursor..import.start]);
                    content.push_str(&correct);
                    cursor = import.end;
                    fixes.push(FixRecord {
                        file: current_file.to_string(),
                        old: import.specifier,
                        new: correct,
                        target: resolution.entry.actual_path.clone(),
                    });
                }
            }
        }
    }
    content.push_str(&source[cursor..]);

    FileOutcome {
        content,
        fixes,
        issues,
    }
}

/// Reads `path` and computes its fixed content. Nothing is written.
pub fn fix_file(path: &Path, current_file: &str, index: &FileIndex) -> Result<FileOutcome> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(fix_source(&source, current_file, index))
}

/// Overwrites `path` with rewritten content.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
