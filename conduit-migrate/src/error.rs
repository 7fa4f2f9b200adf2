//! Error types for conduit-migrate.

use std::path::PathBuf;

use thiserror::Error;

use conduit_core::RegistryError;
use conduit_options::OptionsError;
use conduit_renderer::RenderError;

/// All errors that can arise from planning or applying a migration.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An error from the workspace registry.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The `withNx` argument of a config could not be read.
    #[error("cannot read options in {path}: {source}")]
    Options {
        path: PathBuf,
        #[source]
        source: OptionsError,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `project.json` could not be re-read or serialized.
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A project that would be migrated was not loaded from a `project.json`.
    #[error("project '{project}' has no project.json to update")]
    NoProjectFile { project: String },

    #[error(
        "project '{project}' uses Module Federation, which cannot be migrated to the webpack plugin yet"
    )]
    ModuleFederation { project: String },

    #[error("could not find any projects to migrate")]
    NothingToMigrate,
}

/// Convenience constructor for [`MigrateError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> MigrateError {
    MigrateError::Io {
        path: path.into(),
        source,
    }
}
