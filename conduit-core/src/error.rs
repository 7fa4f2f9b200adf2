//! Error types for conduit-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading a workspace snapshot.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Underlying I/O failure, with the path that was being read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory walk failure during project discovery.
    #[error("failed to walk workspace: {0}")]
    Walk(#[from] walkdir::Error),

    /// `project.json` parse error; includes file path and line context from serde_json.
    #[error("failed to parse project at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `conduit.yaml` parse error.
    #[error("failed to parse config at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The workspace root does not exist or is not a directory.
    #[error("workspace not found at {path}")]
    WorkspaceNotFound { path: PathBuf },

    /// Two targets of one project share a name.
    #[error("project '{project}' declares target '{target}' more than once")]
    DuplicateTarget { project: String, target: String },

    /// Two `project.json` files declare the same project name.
    #[error("project '{name}' is declared by both {first} and {second}")]
    DuplicateProject {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.into(),
        source,
    }
}
