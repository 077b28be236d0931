//! Batch driver.
//!
//! Builds the index, walks the tree a second time fixing each file in walk
//! order, and assembles the report. Per-file read and write failures are
//! logged and skipped; only traversal failures abort the run.

use crate::report::{self, FixRecord, IssueRecord, Report, Summary};
use crate::rewriter::{self, FileOutcome};
use crate::scanner::{self, ScanFilter};
use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use std::path::{Path, PathBuf};

/// How fixed content is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Write every changed file.
    Fix,
    /// Ask before writing each changed file.
    Interactive,
    /// Compute fixes without writing anything.
    Check,
}

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub root: PathBuf,
    pub filter: ScanFilter,
    pub mode: Mode,
    pub verbose: bool,
}

impl RunOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            filter: ScanFilter::default(),
            mode: Mode::Fix,
            verbose: false,
        }
    }
}

/// Runs the full batch: fix the tree, print the summary and save the report.
///
/// Unresolved imports never fail the run; they only show up in the report.
pub fn run(options: &RunOptions, report_path: &Path) -> Result<Report> {
    let report = fix_tree(options)?;

    println!("\n{}", report::render_summary(&report));

    report.save(report_path)?;
    println!(
        "\n{} Report saved to: {}",
        "ok:".green().bold(),
        report_path.display()
    );
    if report.dry_run && !report.fixes.is_empty() {
        println!("{} Run without `check` to apply fixes", "hint:".cyan().bold());
    }

    Ok(report)
}

/// Indexes the tree, fixes every source file and returns the report.
pub fn fix_tree(options: &RunOptions) -> Result<Report> {
    fix_tree_with(options, rewriter::write_file)
}

/// Like [`fix_tree`], but writes changed files through `write`.
pub fn fix_tree_with<W>(options: &RunOptions, mut write: W) -> Result<Report>
where
    W: FnMut(&Path, &str) -> Result<()>,
{
    let root = options.root.as_path();

    eprintln!(
        "{} Building file index for {}",
        "info:".blue().bold(),
        root.display()
    );
    let index = scanner::build_index(root, &options.filter)?;
    eprintln!("{} Found {} files", "info:".blue().bold(), index.len());

    eprintln!("{} Scanning and fixing imports", "info:".blue().bold());
    let files = scanner::collect_source_files(root, &options.filter)?;

    let mut fixes: Vec<FixRecord> = Vec::new();
    let mut issues: Vec<IssueRecord> = Vec::new();
    let mut summary = Summary {
        files_indexed: index.len(),
        ..Default::default()
    };

    for path in &files {
        let current_file = scanner::relative_slash_path(root, path)?;
        let outcome = match rewriter::fix_file(path, &current_file, &index) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("{} {:#}", "warn:".yellow().bold(), e);
                continue;
            }
        };
        summary.files_scanned += 1;

        if options.verbose {
            log_outcome(&outcome);
        }
        issues.extend(outcome.issues.iter().cloned());

        if !outcome.changed() {
            continue;
        }

        if apply_outcome(path, &current_file, &outcome, options.mode, &mut write) {
            if options.mode != Mode::Check {
                summary.files_changed += 1;
            }
            fixes.extend(outcome.fixes);
        }
    }

    Ok(Report::new(fixes, issues, summary, options.mode == Mode::Check))
}

/// Writes (or, in check mode, plans) one file's fixes.
///
/// Returns whether the fixes should be recorded: false when the user
/// declined, the prompt failed or the write failed.
fn apply_outcome<W>(
    path: &Path,
    current_file: &str,
    outcome: &FileOutcome,
    mode: Mode,
    write: &mut W,
) -> bool
where
    W: FnMut(&Path, &str) -> Result<()>,
{
    match mode {
        Mode::Check => {
            println!("{} {}", "Would fix:".yellow().bold(), current_file);
            return true;
        }
        Mode::Interactive => {
            println!("\n{} {}", "Would update:".yellow().bold(), current_file);
            for fix in &outcome.fixes {
                println!("  {} -> {}", fix.old.red(), fix.new.green());
            }
            let confirmed = match Confirm::new()
                .with_prompt("Apply these changes?")
                .default(true)
                .interact()
            {
                Ok(confirmed) => confirmed,
                Err(e) => {
                    eprintln!(
                        "{} Prompt failed for {}, skipping: {}",
                        "warn:".yellow().bold(),
                        current_file,
                        e
                    );
                    return false;
                }
            };
            if !confirmed {
                println!("  {}", "Skipped".dimmed());
                return false;
            }
        }
        Mode::Fix => {}
    }

    match write(path, &outcome.content) {
        Ok(()) => {
            println!("{} {}", "Fixed:".green().bold(), current_file);
            true
        }
        Err(e) => {
            eprintln!("{} {:#}", "warn:".yellow().bold(), e);
            false
        }
    }
}

fn log_outcome(outcome: &FileOutcome) {
    for fix in &outcome.fixes {
        eprintln!(
            "  {} {}: {} -> {}",
            "fix".green(),
            fix.file.dimmed(),
            fix.old,
            fix.new
        );
    }
    for issue in &outcome.issues {
        eprintln!(
            "  {} {}:{}: {} ({})",
            "issue".red(),
            issue.file.dimmed(),
            issue.line,
            issue.import,
            issue.reason
        );
    }
}
