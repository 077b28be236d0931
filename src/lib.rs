//! import-case-fix library for detecting and fixing mis-cased relative imports.
//!
//! The core workflow is a linear three-pass batch over a source tree:
//!
//! 1. **Indexing**: Walk the tree once and build a case-insensitive map from
//!    lower-cased relative path to the file's true on-disk path
//! 2. **Resolving and rewriting**: Walk the tree again, resolve every relative
//!    `from '...'` specifier against the index and rewrite the ones whose
//!    form or casing differs from the canonical specifier
//! 3. **Reporting**: Print a summary and persist the full report as JSON
//!
//! # Example
//!
//! ```no_run
//! use import_case_fix::{resolver, rewriter, scanner};
//! use std::path::Path;
//!
//! let filter = scanner::ScanFilter::default();
//! let index = scanner::build_index(Path::new("src"), &filter).unwrap();
//!
//! let source = "import Button from './components/button';\n";
//! let outcome = rewriter::fix_source(source, "App.tsx", &index);
//!
//! println!("{} fixes, {} issues", outcome.fixes.len(), outcome.issues.len());
//! ```

pub mod cli;
pub mod driver;
pub mod report;
pub mod resolver;
pub mod rewriter;
pub mod scanner;

// Re-export commonly used types at crate root
pub use report::{FixRecord, IssueRecord, Report, Summary};
pub use resolver::{Resolution, ResolveKind};
pub use scanner::{FileEntry, FileIndex, ScanFilter};
