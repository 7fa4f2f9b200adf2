//! Migration entrypoints shared by `conduit migrate` and `conduit diff`.

use std::path::Path;

use conduit_core::{config::load_config_at, registry::load_workspace_at};

use crate::diff::{diff_plan, FileDiff};
use crate::error::MigrateError;
use crate::plan::{plan, MigrateOptions, MigratedTarget, MigrationPlan, SkippedTarget};
use crate::writer::{apply, WriteResult};

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub migrated: Vec<MigratedTarget>,
    pub skipped: Vec<SkippedTarget>,
    pub writes: Vec<WriteResult>,
}

/// Load the workspace at `root` (with its `conduit.yaml`) and plan a migration.
pub fn plan_at(root: &Path, options: &MigrateOptions) -> Result<MigrationPlan, MigrateError> {
    let config = load_config_at(root)?;
    let workspace = load_workspace_at(root, &config)?;
    tracing::debug!(
        "loaded {} projects from {}",
        workspace.projects.len(),
        root.display()
    );
    plan(&workspace, &config.migrate, options)
}

/// Plan and apply a migration of the workspace at `root`.
///
/// Nothing is written when planning fails.
pub fn run(root: &Path, options: &MigrateOptions, dry_run: bool) -> Result<MigrationReport, MigrateError> {
    let plan = plan_at(root, options)?;
    for target in plan.migrated.iter().filter(|t| t.multiple_markers) {
        tracing::warn!(
            "{}:{} calls withNx more than once; only the first call was migrated",
            target.project,
            target.target
        );
    }
    let writes = apply(&plan, dry_run)?;
    Ok(MigrationReport {
        migrated: plan.migrated,
        skipped: plan.skipped,
        writes,
    })
}

/// Plan a migration of the workspace at `root` and diff it against disk.
pub fn preview(root: &Path, options: &MigrateOptions) -> Result<Vec<FileDiff>, MigrateError> {
    diff_plan(&plan_at(root, options)?)
}
