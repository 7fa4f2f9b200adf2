//! # conduit-migrate
//!
//! Converts projects built with a legacy `withNx(...)` webpack config to the
//! standard webpack plugin config.
//!
//! [`plan`] decides what changes, [`apply`] performs them with atomic writes,
//! and [`diff_plan`] previews them. [`pipeline::run`] ties the three to a
//! workspace on disk.

pub mod diff;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod plan;
pub mod writer;

pub use diff::{diff_plan, FileDiff};
pub use error::MigrateError;
pub use pipeline::{plan_at, preview, run, MigrationReport};
pub use plan::{
    plan, MigrateOptions, MigratedTarget, MigrationPlan, PlannedRename, PlannedWrite, SkipReason,
    SkippedTarget, STANDARD_CONFIG_FLAG,
};
pub use writer::{apply, WriteResult};
