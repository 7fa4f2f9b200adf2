//! Domain types for a conduit workspace snapshot.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Option bags stay untyped (`serde_json::Map`) and keep declaration order.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RegistryError;

/// Untyped, order-preserving option bag attached to a target or configuration.
pub type OptionsBag = Map<String, Value>;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed project name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectName(pub String);

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed target name, unique within its project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetName(pub String);

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TargetName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TargetName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl PartialEq<str> for TargetName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TargetName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A single named target on a project.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetDefinition {
    pub name: TargetName,
    /// Display group label. Never `Some("")`; blank labels are stored as `None`.
    pub group: Option<String>,
    pub executor: Option<String>,
    pub options: OptionsBag,
    /// Named variants of `options`, in declaration order.
    pub configurations: Map<String, Value>,
}

impl TargetDefinition {
    pub fn new(name: impl Into<TargetName>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the group label. Blank labels clear it.
    pub fn with_group(mut self, label: impl Into<String>) -> Self {
        self.group = clean_label(label.into());
        self
    }

    pub fn with_executor(mut self, executor: impl Into<String>) -> Self {
        self.executor = Some(executor.into());
        self
    }

    pub fn with_options(mut self, options: OptionsBag) -> Self {
        self.options = options;
        self
    }

    /// Names of the declared configurations, in declaration order.
    pub fn configuration_names(&self) -> Vec<String> {
        self.configurations.keys().cloned().collect()
    }

    /// A string option from the base option bag.
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(Value::as_str)
    }
}

/// A project and its targets, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: ProjectName,
    /// Project directory relative to the workspace root (forward slashes).
    pub root: String,
    /// The `project.json` this project was loaded from, if any.
    pub source: Option<PathBuf>,
    targets: Vec<TargetDefinition>,
}

impl Project {
    /// Build a project, rejecting duplicate target names.
    pub fn new(
        name: impl Into<ProjectName>,
        root: impl Into<String>,
        targets: Vec<TargetDefinition>,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        for (i, target) in targets.iter().enumerate() {
            if targets[..i].iter().any(|t| t.name == target.name) {
                return Err(RegistryError::DuplicateTarget {
                    project: name.0.clone(),
                    target: target.name.0.clone(),
                });
            }
        }
        Ok(Self {
            name,
            root: root.into(),
            source: None,
            targets,
        })
    }

    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.source = Some(source);
        self
    }

    pub fn targets(&self) -> &[TargetDefinition] {
        &self.targets
    }

    pub fn target(&self, name: &str) -> Option<&TargetDefinition> {
        self.targets.iter().find(|t| t.name.0 == name)
    }

    pub fn target_names(&self) -> impl Iterator<Item = &TargetName> {
        self.targets.iter().map(|t| &t.name)
    }

    /// `true` if any target runs one of `executors`.
    pub fn uses_any_executor(&self, executors: &[String]) -> bool {
        self.targets
            .iter()
            .filter_map(|t| t.executor.as_deref())
            .any(|e| executors.iter().any(|x| x == e))
    }
}

/// A loaded workspace: root directory plus every discovered project.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub root: PathBuf,
    /// Sorted by project name.
    pub projects: Vec<Project>,
}

impl Workspace {
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name.0 == name)
    }
}

pub(crate) fn clean_label(label: String) -> Option<String> {
    if label.trim().is_empty() {
        None
    } else {
        Some(label)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
