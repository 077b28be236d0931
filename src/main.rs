//! import-case-fix: Detect and fix mis-cased relative imports in JS/TS trees.
//!
//! Indexes the files under the source root, resolves every relative
//! `from '...'` import case-insensitively, rewrites specifiers that don't
//! match the on-disk path, and saves a JSON report of fixes and issues.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use import_case_fix::cli::{Args, Commands};
use import_case_fix::driver::{self, Mode, RunOptions};
use import_case_fix::scanner::{self, ScanFilter};
use std::path::Path;

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = ScanFilter::from_globs(&args.exclude)?;

    match args.command.clone().unwrap_or_default() {
        Commands::Fix { interactive } => {
            let mode = if interactive { Mode::Interactive } else { Mode::Fix };
            cmd_run(&args, filter, mode)
        }
        Commands::Check => cmd_run(&args, filter, Mode::Check),
        Commands::Scan => cmd_scan(&args.root, &filter),
    }
}

fn cmd_run(args: &Args, filter: ScanFilter, mode: Mode) -> Result<()> {
    let options = RunOptions {
        root: args.root.clone(),
        filter,
        mode,
        verbose: args.verbose,
    };
    driver::run(&options, &args.report)?;
    println!("\n{}", "Done!".bold());
    Ok(())
}

fn cmd_scan(root: &Path, filter: &ScanFilter) -> Result<()> {
    let files = scanner::collect_source_files(root, filter)?;

    println!("Would index {} files:", files.len());
    for file in files {
        println!("  {}", file.display());
    }

    Ok(())
}
