//! Workspace registry: discovers `project.json` files and loads them into
//! [`Project`] snapshots.
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   conduit.yaml              (optional, see [`crate::config`])
//!   apps/
//!     shop/
//!       project.json          (one project per file)
//!   libs/
//!     ui/
//!       project.json
//! ```
//!
//! `project.json` follows the Nx shape: `name`, `root`, `targets` (ordered
//! object of target name → definition) and optional `metadata.targetGroups`.
//! Target declaration order is preserved end to end.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::config::WorkspaceConfig;
use crate::error::{io_err, RegistryError};
use crate::types::{clean_label, OptionsBag, Project, TargetDefinition, Workspace};

/// File name of a project definition.
pub const PROJECT_FILE: &str = "project.json";

/// Directory names never descended into during discovery.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &["node_modules", "dist", ".git", "tmp"];

// ---------------------------------------------------------------------------
// Raw file shape
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProject {
    name: Option<String>,
    root: Option<String>,
    #[serde(default)]
    targets: Map<String, Value>,
    #[serde(default)]
    metadata: RawProjectMetadata,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProjectMetadata {
    /// Ordered label → target names.
    #[serde(default)]
    target_groups: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTarget {
    executor: Option<String>,
    group: Option<String>,
    #[serde(default)]
    options: OptionsBag,
    #[serde(default)]
    configurations: Map<String, Value>,
    #[serde(default)]
    metadata: RawTargetMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct RawTargetMetadata {
    group: Option<String>,
}

// ---------------------------------------------------------------------------
// 1. Parse
// ---------------------------------------------------------------------------

/// Parse a single `project.json` body.
///
/// `default_name` and `default_root` are used when the file omits `name` /
/// `root` (normally the directory name and its workspace-relative path).
pub fn parse_project(
    contents: &str,
    path: &Path,
    default_name: &str,
    default_root: &str,
) -> Result<Project, RegistryError> {
    let raw: RawProject = serde_json::from_str(contents).map_err(|e| RegistryError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    let name = raw.name.unwrap_or_else(|| default_name.to_string());

    let mut targets = Vec::with_capacity(raw.targets.len());
    for (target_name, body) in raw.targets {
        let raw_target: RawTarget =
            serde_json::from_value(body).map_err(|e| RegistryError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        let group = raw_target
            .group
            .and_then(clean_label)
            .or_else(|| raw_target.metadata.group.and_then(clean_label))
            .or_else(|| declared_group(&raw.metadata.target_groups, &target_name));
        targets.push(TargetDefinition {
            name: target_name.into(),
            group,
            executor: raw_target.executor,
            options: raw_target.options,
            configurations: raw_target.configurations,
        });
    }

    for (label, members) in &raw.metadata.target_groups {
        for member in members.as_array().into_iter().flatten() {
            if let Some(member) = member.as_str() {
                if !targets.iter().any(|t| t.name == member) {
                    tracing::debug!(
                        "{}: targetGroups '{label}' lists unknown target '{member}'",
                        path.display()
                    );
                }
            }
        }
    }

    let root = raw.root.unwrap_or_else(|| default_root.to_string());
    Ok(Project::new(name, root, targets)?.with_source(path.to_path_buf()))
}

/// First `targetGroups` label listing `target`.
fn declared_group(target_groups: &Map<String, Value>, target: &str) -> Option<String> {
    target_groups
        .iter()
        .find(|(_, members)| {
            members
                .as_array()
                .is_some_and(|m| m.iter().any(|v| v.as_str() == Some(target)))
        })
        .and_then(|(label, _)| clean_label(label.clone()))
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load one `project.json` from disk.
pub fn load_project_at(root: &Path, path: &Path) -> Result<Project, RegistryError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let dir = path.parent().unwrap_or(root);
    let default_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let default_root = relative_slash_path(root, dir);
    parse_project(&contents, path, &default_name, &default_root)
}

/// Paths of every `project.json` under `root`, sorted.
pub fn discover_project_files_at(
    root: &Path,
    config: &WorkspaceConfig,
) -> Result<Vec<PathBuf>, RegistryError> {
    if !root.is_dir() {
        return Err(RegistryError::WorkspaceNotFound {
            path: root.to_path_buf(),
        });
    }

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e.file_name(), config));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name() == PROJECT_FILE {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Discover and load every project under `root`. Results are sorted by project name.
pub fn load_workspace_at(
    root: &Path,
    config: &WorkspaceConfig,
) -> Result<Workspace, RegistryError> {
    let mut projects: Vec<Project> = Vec::new();
    for path in discover_project_files_at(root, config)? {
        let project = load_project_at(root, &path)?;
        if let Some(existing) = projects.iter().find(|p| p.name == project.name) {
            return Err(RegistryError::DuplicateProject {
                name: project.name.0.clone(),
                first: existing.source.clone().unwrap_or_default(),
                second: path,
            });
        }
        tracing::debug!(
            "loaded project '{}' ({} targets) from {}",
            project.name,
            project.targets().len(),
            path.display()
        );
        projects.push(project);
    }
    projects.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Workspace {
        root: root.to_path_buf(),
        projects,
    })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn is_ignored(name: &std::ffi::OsStr, config: &WorkspaceConfig) -> bool {
    let name = name.to_string_lossy();
    DEFAULT_IGNORED_DIRS.iter().any(|d| *d == name) || config.ignore.iter().any(|d| *d == name)
}

/// `dir` relative to `root`, joined with `/`. The root itself maps to `"."`.
fn relative_slash_path(root: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(root).unwrap_or(dir);
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
