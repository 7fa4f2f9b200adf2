//! `conduit diff`: show unified diffs for what migrate would write.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use conduit_migrate::{pipeline, MigrateOptions};

/// Arguments for `conduit diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Only diff this project.
    #[arg(long)]
    pub project: Option<String>,

    /// Diff against unformatted output.
    #[arg(long)]
    pub skip_format: bool,
}

impl DiffArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let options = MigrateOptions {
            project: self.project,
            skip_format: self.skip_format,
        };
        let diffs = pipeline::preview(root, &options)
            .with_context(|| format!("diff failed in {}", root.display()))?;

        if diffs.is_empty() {
            println!("No differences.");
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }
        Ok(())
    }
}
