//! Command-line interface definitions.
//!
//! Defines the argument parser and subcommands using clap's derive API.
//! Running without a subcommand fixes the tree in place, exactly like `fix`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Detect and fix mis-cased relative import paths in JS/TS source trees.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Source root to index and fix.
    #[arg(short, long, global = true, default_value = "src")]
    pub root: PathBuf,

    /// Where to write the JSON report.
    #[arg(long, global = true, default_value = "import-fix-report.json")]
    pub report: PathBuf,

    /// Glob patterns for directories/files to exclude (e.g., "__tests__", "*.stories.tsx").
    /// `node_modules`, `.git` and `dist` are always excluded.
    #[arg(short, long, global = true)]
    pub exclude: Vec<String>,

    /// Print every fix and issue as it is found.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Rewrite mismatched imports in place and save the report.
    Fix {
        /// Interactively confirm each file's changes before writing.
        #[arg(short, long)]
        interactive: bool,
    },

    /// Report what would be fixed without modifying any file.
    Check,

    /// List files that would be indexed without processing them.
    Scan,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Fix { interactive: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_fixed_constants() {
        let args = Args::try_parse_from(["import-case-fix"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.root, PathBuf::from("src"));
        assert_eq!(args.report, PathBuf::from("import-fix-report.json"));
        assert!(args.exclude.is_empty());
    }

    #[test]
    fn global_options_follow_subcommand() {
        let args = Args::try_parse_from([
            "import-case-fix",
            "check",
            "--root",
            "app",
            "-e",
            "__tests__",
            "-e",
            "*.stories.tsx",
        ])
        .unwrap();
        assert!(matches!(args.command, Some(Commands::Check)));
        assert_eq!(args.root, PathBuf::from("app"));
        assert_eq!(args.exclude, vec!["__tests__", "*.stories.tsx"]);
    }

    #[test]
    fn fix_accepts_interactive() {
        let args = Args::try_parse_from(["import-case-fix", "fix", "-i"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Commands::Fix { interactive: true })
        ));
    }
}
