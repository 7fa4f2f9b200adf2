//! conduit core library: workspace types, project registry, target grouping.
//!
//! - [`types`]: newtypes and domain structs
//! - [`error`]: [`RegistryError`]
//! - [`config`]: optional `conduit.yaml`
//! - [`registry`]: `project.json` discovery and loading
//! - [`grouping`]: partition targets into display groups
//! - [`presenter`]: display tree over a grouping

pub mod config;
pub mod error;
pub mod grouping;
pub mod presenter;
pub mod registry;
pub mod types;

pub use config::{MigrateConfig, WorkspaceConfig};
pub use error::RegistryError;
pub use grouping::{group_targets, GroupKey, GroupingResult, TargetGroup};
pub use presenter::{present, ActionHooks, DisplayItem, DisplayNode, DisplayTree, NodeHeading, TargetRef};
pub use types::{OptionsBag, Project, ProjectName, TargetDefinition, TargetName, Workspace};
