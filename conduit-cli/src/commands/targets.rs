//! `conduit targets <project>`: print the grouped target list.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use conduit_core::{group_targets, present, DisplayItem, DisplayTree};

use super::load_workspace;

/// Arguments for `conduit targets`.
#[derive(Args, Debug)]
pub struct TargetsArgs {
    /// Project name.
    pub project: String,

    /// Emit the display tree as JSON.
    #[arg(long)]
    pub json: bool,
}

impl TargetsArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let workspace = load_workspace(root)?;
        let project = workspace
            .project(&self.project)
            .with_context(|| format!("project '{}' not found in {}", self.project, root.display()))?;

        let tree = present(project, &group_targets(project));
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&tree).context("failed to serialize targets JSON")?
            );
            return Ok(());
        }

        println!("{} ({})", project.name.0.bold(), project.root);
        match &tree {
            DisplayTree::Flat(items) if items.is_empty() => println!("  no targets"),
            DisplayTree::Flat(items) => {
                for item in items {
                    print_item(item, "  ");
                }
            }
            DisplayTree::Grouped(nodes) => {
                for node in nodes {
                    println!("  {} {}", node.heading.label().bold(), format!("({})", node.count).bright_black());
                    for item in &node.items {
                        print_item(item, "    ");
                    }
                }
            }
        }
        Ok(())
    }
}

fn print_item(item: &DisplayItem, indent: &str) {
    let executor = item.executor.as_deref().unwrap_or("-");
    let mut line = format!("{indent}{}  {}", item.target, executor.bright_black());
    if !item.configurations.is_empty() {
        line.push_str(&format!("  [{}]", item.configurations.join(", ")));
    }
    println!("{line}");
}
