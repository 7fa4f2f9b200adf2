pub mod diff;
pub mod migrate;
pub mod projects;
pub mod targets;

use std::path::Path;

use anyhow::{Context, Result};

use conduit_core::{config::load_config_at, registry::load_workspace_at, Workspace};

/// Load `conduit.yaml` and every project under `root`.
pub(crate) fn load_workspace(root: &Path) -> Result<Workspace> {
    let config = load_config_at(root)
        .with_context(|| format!("failed to read config in {}", root.display()))?;
    load_workspace_at(root, &config)
        .with_context(|| format!("failed to load workspace at {}", root.display()))
}
