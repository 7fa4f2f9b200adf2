//! `conduit migrate`: convert legacy webpack configs.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use conduit_migrate::{pipeline, MigrateOptions, MigrationReport, WriteResult};

/// Arguments for `conduit migrate`.
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Only migrate this project.
    #[arg(long)]
    pub project: Option<String>,

    /// Write files exactly as rendered, without the whitespace pass.
    #[arg(long)]
    pub skip_format: bool,

    /// Show what would change without touching any files.
    #[arg(long)]
    pub dry_run: bool,
}

impl MigrateArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let options = MigrateOptions {
            project: self.project,
            skip_format: self.skip_format,
        };
        let report = pipeline::run(root, &options, self.dry_run)
            .with_context(|| format!("migration failed in {}", root.display()))?;
        print_report(root, &report, self.dry_run);
        Ok(())
    }
}

fn print_report(root: &Path, report: &MigrationReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    println!(
        "{prefix}✓ migrated {} target(s), skipped {}",
        report.migrated.len(),
        report.skipped.len()
    );
    for target in &report.migrated {
        println!("  {}:{}", target.project, target.target);
    }
    for skipped in &report.skipped {
        println!("  skipped {}:{} ({})", skipped.project, skipped.target, skipped.reason);
    }

    let rel = |p: &Path| p.strip_prefix(root).unwrap_or(p).display().to_string();
    for w in &report.writes {
        match w {
            WriteResult::Written { path } => println!("  ✎  {}", rel(path)),
            WriteResult::WouldWrite { path } => println!("  ~  {}", rel(path)),
            WriteResult::Renamed { from, to } => println!("  →  {} -> {}", rel(from), rel(to)),
            WriteResult::WouldRename { from, to } => println!("  ~  {} -> {}", rel(from), rel(to)),
        }
    }
}
