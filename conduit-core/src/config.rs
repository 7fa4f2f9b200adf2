//! Optional workspace configuration, read from `<root>/conduit.yaml`.
//!
//! Every field has a default, so an absent file and an empty file behave the
//! same way.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, RegistryError};

/// File name looked up at the workspace root.
pub const CONFIG_FILE: &str = "conduit.yaml";

/// Executor whose targets are migrated.
pub const DEFAULT_WEBPACK_EXECUTOR: &str = "@nx/webpack:webpack";

/// Executors that make a project ineligible for migration.
pub const DEFAULT_INCOMPATIBLE_EXECUTORS: &[&str] = &[
    "@nx/react:module-federation-dev-server",
    "@nx/angular:module-federation-dev-server",
];

/// Root of `conduit.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Extra directory names skipped during project discovery.
    pub ignore: Vec<String>,
    pub migrate: MigrateConfig,
}

/// Settings for `conduit migrate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrateConfig {
    pub webpack_executor: String,
    pub incompatible_executors: Vec<String>,
    /// Option keys treated as paths in addition to the built-in allowlist.
    pub extra_path_keys: Vec<String>,
    /// Directory, relative to the workspace root, holding `.tera` overrides
    /// for the generated config.
    pub template_dir: Option<PathBuf>,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            webpack_executor: DEFAULT_WEBPACK_EXECUTOR.to_string(),
            incompatible_executors: DEFAULT_INCOMPATIBLE_EXECUTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extra_path_keys: vec![],
            template_dir: None,
        }
    }
}

/// `<root>/conduit.yaml`. Pure, no I/O.
pub fn config_path_at(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Load `<root>/conduit.yaml`, falling back to defaults when it is absent.
///
/// Returns `RegistryError::Config` (with path + line context) if malformed.
pub fn load_config_at(root: &Path) -> Result<WorkspaceConfig, RegistryError> {
    let path = config_path_at(root);
    if !path.exists() {
        return Ok(WorkspaceConfig::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    if contents.trim().is_empty() {
        return Ok(WorkspaceConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| RegistryError::Config { path, source: e })
}
