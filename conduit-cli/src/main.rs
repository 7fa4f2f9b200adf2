//! conduit: inspect Nx-style workspaces and migrate legacy webpack configs.
//!
//! # Usage
//!
//! ```text
//! conduit [-w <root>] projects [--json]
//! conduit [-w <root>] targets <project> [--json]
//! conduit [-w <root>] migrate [--project <name>] [--skip-format] [--dry-run]
//! conduit [-w <root>] diff [--project <name>] [--skip-format]
//! ```
//!
//! Set `RUST_LOG=debug` to see why targets were skipped.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, migrate::MigrateArgs, projects::ProjectsArgs, targets::TargetsArgs};

#[derive(Parser, Debug)]
#[command(
    name = "conduit",
    version,
    about = "Group workspace targets and migrate legacy webpack configs",
    long_about = None,
)]
struct Cli {
    /// Workspace root.
    #[arg(short = 'w', long, global = true, default_value = ".")]
    workspace: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List projects in the workspace.
    Projects(ProjectsArgs),

    /// Show a project's targets grouped by label.
    Targets(TargetsArgs),

    /// Convert `withNx(...)` webpack configs to the standard plugin config.
    Migrate(MigrateArgs),

    /// Show unified diff of what migrate would write.
    Diff(DiffArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Projects(args) => args.run(&cli.workspace),
        Commands::Targets(args) => args.run(&cli.workspace),
        Commands::Migrate(args) => args.run(&cli.workspace),
        Commands::Diff(args) => args.run(&cli.workspace),
    }
}
