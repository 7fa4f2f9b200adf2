//! Migration planning: decide what to rename and write, without touching disk.
//!
//! Every target running the configured webpack executor is a candidate.
//! A candidate is migrated when its `webpackConfig` option points at an
//! existing file whose source calls `withNx`. Only base options are read;
//! configurations are never migrated on their own.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use conduit_core::{MigrateConfig, Project, ProjectName, TargetDefinition, TargetName, Workspace};
use conduit_options::{Extractor, Normalizer};
use conduit_renderer::{legacy_file_name, Renderer, WebpackConfigContext};

use crate::error::{io_err, MigrateError};
use crate::format::format_text_keeping;

/// Option set on migrated targets.
pub const STANDARD_CONFIG_FLAG: &str = "standardWebpackConfigFunction";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrateOptions {
    /// Only migrate this project.
    pub project: Option<String>,
    /// Write files exactly as rendered.
    pub skip_format: bool,
}

/// A target whose config will be replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratedTarget {
    pub project: ProjectName,
    pub target: TargetName,
    pub webpack_config: PathBuf,
    pub legacy_config: PathBuf,
    /// `withNx` was called more than once; the first call was used.
    pub multiple_markers: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoWebpackConfig,
    ConfigNotFound(PathBuf),
    NoMarker(PathBuf),
    /// Another target already migrates the same file.
    SharedConfig(PathBuf),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoWebpackConfig => f.write_str("no webpackConfig option"),
            SkipReason::ConfigNotFound(p) => write!(f, "{} does not exist", p.display()),
            SkipReason::NoMarker(p) => write!(f, "{} does not call withNx", p.display()),
            SkipReason::SharedConfig(p) => write!(f, "{} is already migrated by another target", p.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTarget {
    pub project: ProjectName,
    pub target: TargetName,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRename {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWrite {
    pub path: PathBuf,
    pub content: String,
}

/// Everything a migration run would do. Renames are applied before writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    pub root: PathBuf,
    pub migrated: Vec<MigratedTarget>,
    pub skipped: Vec<SkippedTarget>,
    pub renames: Vec<PlannedRename>,
    pub writes: Vec<PlannedWrite>,
}

/// Plan the migration of `workspace`.
///
/// Fails with [`MigrateError::ModuleFederation`] as soon as a candidate's
/// project runs an incompatible executor, and with
/// [`MigrateError::NothingToMigrate`] when no candidate qualifies.
pub fn plan(
    workspace: &Workspace,
    config: &MigrateConfig,
    options: &MigrateOptions,
) -> Result<MigrationPlan, MigrateError> {
    let renderer = match &config.template_dir {
        Some(dir) => Renderer::with_overrides(&workspace.root.join(dir))?,
        None => Renderer::new()?,
    };
    let planner = Planner {
        root: &workspace.root,
        config,
        options,
        renderer,
        extractor: Extractor::default(),
        normalizer: Normalizer::with_extra_keys(config.extra_path_keys.iter().cloned()),
    };
    planner.run(workspace)
}

struct Planner<'a> {
    root: &'a Path,
    config: &'a MigrateConfig,
    options: &'a MigrateOptions,
    renderer: Renderer,
    extractor: Extractor,
    normalizer: Normalizer,
}

/// Per-target outcome of [`Planner::target`].
enum Outcome {
    Migrate {
        migrated: MigratedTarget,
        config_write: PlannedWrite,
    },
    Skip(SkipReason),
}

impl Planner<'_> {
    fn run(&self, workspace: &Workspace) -> Result<MigrationPlan, MigrateError> {
        let mut plan = MigrationPlan {
            root: self.root.to_path_buf(),
            migrated: Vec::new(),
            skipped: Vec::new(),
            renames: Vec::new(),
            writes: Vec::new(),
        };
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut config_writes = Vec::new();

        for project in &workspace.projects {
            if self
                .options
                .project
                .as_deref()
                .is_some_and(|only| only != project.name.0)
            {
                continue;
            }

            let mut flagged: Vec<&TargetName> = Vec::new();
            for target in project.targets() {
                if target.executor.as_deref() != Some(self.config.webpack_executor.as_str()) {
                    continue;
                }
                if project.uses_any_executor(&self.config.incompatible_executors) {
                    return Err(MigrateError::ModuleFederation {
                        project: project.name.0.clone(),
                    });
                }

                match self.target(project, target, &claimed)? {
                    Outcome::Migrate {
                        migrated,
                        config_write,
                    } => {
                        tracing::debug!(
                            "planned {}:{} ({})",
                            project.name,
                            target.name,
                            migrated.webpack_config.display()
                        );
                        claimed.insert(migrated.webpack_config.clone());
                        plan.renames.push(PlannedRename {
                            from: migrated.webpack_config.clone(),
                            to: migrated.legacy_config.clone(),
                        });
                        config_writes.push(config_write);
                        flagged.push(&target.name);
                        plan.migrated.push(migrated);
                    }
                    Outcome::Skip(reason) => {
                        tracing::debug!("skipping {}:{}: {reason}", project.name, target.name);
                        plan.skipped.push(SkippedTarget {
                            project: project.name.clone(),
                            target: target.name.clone(),
                            reason,
                        });
                    }
                }
            }

            if !flagged.is_empty() {
                plan.writes.push(self.project_file_write(project, &flagged)?);
            }
        }

        if plan.migrated.is_empty() {
            return Err(MigrateError::NothingToMigrate);
        }
        plan.writes.extend(config_writes);
        Ok(plan)
    }

    fn target(
        &self,
        project: &Project,
        target: &TargetDefinition,
        claimed: &HashSet<PathBuf>,
    ) -> Result<Outcome, MigrateError> {
        let Some(rel) = target.option_str("webpackConfig").filter(|s| !s.trim().is_empty()) else {
            return Ok(Outcome::Skip(SkipReason::NoWebpackConfig));
        };
        let path = self.root.join(rel);
        if claimed.contains(&path) {
            return Ok(Outcome::Skip(SkipReason::SharedConfig(path)));
        }
        if !path.is_file() {
            return Ok(Outcome::Skip(SkipReason::ConfigNotFound(path)));
        }

        let source = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let options_err = |source| MigrateError::Options {
            path: path.clone(),
            source,
        };
        let Some(found) = self.extractor.extract(&source).map_err(options_err)? else {
            return Ok(Outcome::Skip(SkipReason::NoMarker(path)));
        };

        let options: Option<Map<String, Value>> = match &found.app.argument {
            Some(arg) => {
                let raw = arg.parse().map_err(options_err)?;
                Some(self.normalizer.normalize(&project.root, &raw))
            }
            None => None,
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let legacy_config = path.with_file_name(legacy_file_name(&file_name));
        let ctx = WebpackConfigContext::new(&file_name, options.as_ref(), found.react_options())?;
        let rendered = self.renderer.render_webpack_config(&ctx)?;
        let content = self.finish(rendered, found.react_options());

        Ok(Outcome::Migrate {
            migrated: MigratedTarget {
                project: project.name.clone(),
                target: target.name.clone(),
                webpack_config: path.clone(),
                legacy_config,
                multiple_markers: found.app.occurrences > 1,
            },
            config_write: PlannedWrite { path, content },
        })
    }

    /// Re-read `project.json` and set the standard-config flag on `targets`.
    ///
    /// Works on the raw document so unknown fields and key order survive.
    fn project_file_write(
        &self,
        project: &Project,
        targets: &[&TargetName],
    ) -> Result<PlannedWrite, MigrateError> {
        let path = project.source.clone().ok_or_else(|| MigrateError::NoProjectFile {
            project: project.name.0.clone(),
        })?;
        let json_err = |source| MigrateError::Json {
            path: path.clone(),
            source,
        };
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let mut doc: Value = serde_json::from_str(&contents).map_err(json_err)?;

        for name in targets {
            set_standard_flag(&mut doc, &name.0);
        }

        let content = serde_json::to_string_pretty(&doc).map_err(json_err)?;
        Ok(PlannedWrite {
            path,
            content: self.finish(content, None),
        })
    }

    /// Format `content` unless formatting is switched off. `verbatim` is
    /// forwarded source text whose lines must not change.
    fn finish(&self, content: String, verbatim: Option<&str>) -> String {
        if self.options.skip_format {
            content
        } else {
            format_text_keeping(&content, verbatim)
        }
    }
}

fn set_standard_flag(doc: &mut Value, target: &str) {
    let Some(target) = doc
        .get_mut("targets")
        .and_then(|t| t.get_mut(target))
        .and_then(Value::as_object_mut)
    else {
        return;
    };
    let options = target
        .entry("options")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(options) = options.as_object_mut() {
        options.insert(STANDARD_CONFIG_FLAG.to_string(), Value::Bool(true));
    }
}
