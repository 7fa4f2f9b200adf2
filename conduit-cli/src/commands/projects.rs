//! `conduit projects`: list projects with target and group counts.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use conduit_core::group_targets;

use super::load_workspace;

/// Arguments for `conduit projects`.
#[derive(Args, Debug)]
pub struct ProjectsArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize, Tabled)]
struct ProjectRow {
    #[tabled(rename = "project")]
    name: String,
    #[tabled(rename = "root")]
    root: String,
    #[tabled(rename = "targets")]
    targets: usize,
    #[tabled(rename = "groups")]
    groups: usize,
}

impl ProjectsArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let workspace = load_workspace(root)?;
        let rows: Vec<ProjectRow> = workspace
            .projects
            .iter()
            .map(|p| ProjectRow {
                name: p.name.0.clone(),
                root: p.root.clone(),
                targets: p.targets().len(),
                groups: group_targets(p)
                    .groups()
                    .iter()
                    .filter(|g| !g.targets.is_empty())
                    .count(),
            })
            .collect();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize projects JSON")?
            );
            return Ok(());
        }

        if rows.is_empty() {
            println!("No projects found under {}.", root.display());
            return Ok(());
        }
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
