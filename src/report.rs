//! Fix and issue records, and the end-of-run report.
//!
//! The console summary is truncated to keep long runs readable; the JSON
//! report written to disk always holds every record.

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

/// Reason attached to imports whose target isn't in the index.
pub const REASON_NOT_FOUND: &str = "File not found";

/// Fixes listed in the console summary before truncating.
pub const MAX_LISTED_FIXES: usize = 50;

/// Issues listed in the console summary before truncating.
pub const MAX_LISTED_ISSUES: usize = 20;

/// A rewritten import specifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixRecord {
    /// Importing file, relative to the scan root.
    pub file: String,
    /// Specifier as it was written.
    pub old: String,
    /// Canonical specifier that replaced it.
    pub new: String,
    /// True-case relative path of the resolved file.
    pub target: String,
}

/// A relative import that couldn't be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    pub file: String,
    pub import: String,
    /// Line number, 1-indexed.
    pub line: usize,
    pub reason: String,
}

/// Summary counts for a run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_fixes: usize,
    pub total_issues: usize,
    pub files_indexed: usize,
    pub files_scanned: usize,
    pub files_changed: usize,
}

/// Complete results of a run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// RFC 3339 UTC time the report was assembled.
    pub timestamp: String,
    /// True when no source file was written.
    pub dry_run: bool,
    pub fixes: Vec<FixRecord>,
    pub issues: Vec<IssueRecord>,
    pub summary: Summary,
}

impl Report {
    /// Assembles a report, filling in the fix and issue totals.
    pub fn new(
        fixes: Vec<FixRecord>,
        issues: Vec<IssueRecord>,
        mut summary: Summary,
        dry_run: bool,
    ) -> Self {
        summary.total_fixes = fixes.len();
        summary.total_issues = issues.len();
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            dry_run,
            fixes,
            issues,
            summary,
        }
    }

    /// Writes the full report as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))
    }
}

/// Renders the human-readable summary banner.
///
/// At most [`MAX_LISTED_FIXES`] fixes and [`MAX_LISTED_ISSUES`] issues are
/// listed, followed by a count of the remainder.
pub fn render_summary(report: &Report) -> String {
    let rule = "=".repeat(80);
    let mut lines = vec![
        rule.clone(),
        "SUMMARY".bold().to_string(),
        rule,
        format!(
            "{}: {}",
            if report.dry_run { "Fixes planned" } else { "Fixes applied" },
            report.fixes.len()
        ),
        format!("Issues found: {}", report.issues.len()),
    ];

    if !report.fixes.is_empty() {
        let heading = if report.dry_run { "WOULD FIX:" } else { "FIXED:" };
        lines.push(String::new());
        lines.push(heading.green().bold().to_string());
        for (i, fix) in report.fixes.iter().take(MAX_LISTED_FIXES).enumerate() {
            lines.push(String::new());
            lines.push(format!("{}. {}", i + 1, fix.file));
            lines.push(format!("   {} -> {}", fix.old.red(), fix.new.green()));
        }
        if report.fixes.len() > MAX_LISTED_FIXES {
            lines.push(String::new());
            lines.push(format!(
                "... and {} more fixes",
                report.fixes.len() - MAX_LISTED_FIXES
            ));
        }
    }

    if !report.issues.is_empty() {
        lines.push(String::new());
        lines.push("ISSUES (files not found):".red().bold().to_string());
        for (i, issue) in report.issues.iter().take(MAX_LISTED_ISSUES).enumerate() {
            lines.push(String::new());
            lines.push(format!("{}. {}:{}", i + 1, issue.file, issue.line));
            lines.push(format!("   Import: {}", issue.import.yellow()));
        }
        if report.issues.len() > MAX_LISTED_ISSUES {
            lines.push(String::new());
            lines.push(format!(
                "... and {} more issues",
                report.issues.len() - MAX_LISTED_ISSUES
            ));
        }
    }

    lines.join("\n")
}
