//! Apply a [`MigrationPlan`] to disk.
//!
//! ## Protocol
//!
//! 1. Stage: write every planned file to `<path>.conduit.tmp`, remembering
//!    what the final path held before.
//! 2. Commit: rename every legacy config to its `.old` name, then rename
//!    each tmp file over its final path (atomic on POSIX).
//! 3. On any failure, undo the committed steps in reverse order and remove
//!    the remaining tmp files, so the workspace is left as it was found.
//!
//! In dry-run mode nothing is touched and the would-be actions are returned.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, MigrateError};
use crate::plan::MigrationPlan;

/// Outcome of an individual file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written.
    Written { path: PathBuf },
    /// Legacy config was moved aside.
    Renamed { from: PathBuf, to: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been renamed.
    WouldRename { from: PathBuf, to: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path } | WriteResult::WouldWrite { path } => path,
            WriteResult::Renamed { to, .. } | WriteResult::WouldRename { to, .. } => to,
        }
    }
}

/// Apply `plan`: all or nothing.
pub fn apply(plan: &MigrationPlan, dry_run: bool) -> Result<Vec<WriteResult>, MigrateError> {
    if dry_run {
        return Ok(dry_run_results(plan));
    }

    let staged = stage_all(plan)?;
    let mut journal = Journal::default();
    match commit(plan, &staged, &mut journal) {
        Ok(results) => Ok(results),
        Err(err) => {
            tracing::warn!("migration failed, restoring {} file(s): {err}", journal.steps.len());
            journal.roll_back();
            discard(&staged);
            Err(err)
        }
    }
}

fn dry_run_results(plan: &MigrationPlan) -> Vec<WriteResult> {
    let renames = plan.renames.iter().map(|r| {
        tracing::info!("[dry-run] would rename: {} -> {}", r.from.display(), r.to.display());
        WriteResult::WouldRename {
            from: r.from.clone(),
            to: r.to.clone(),
        }
    });
    let writes = plan.writes.iter().map(|w| {
        tracing::info!("[dry-run] would write: {}", w.path.display());
        WriteResult::WouldWrite {
            path: w.path.clone(),
        }
    });
    renames.chain(writes).collect()
}

/// A planned file written next to its final path.
#[derive(Debug)]
struct StagedFile {
    path: PathBuf,
    tmp: PathBuf,
    /// Content of `path` before the migration; `None` when it did not exist
    /// or is moved aside by a rename.
    previous: Option<String>,
}

fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.conduit.tmp", path.display()))
}

/// Stage every planned write; on failure nothing staged is left behind.
fn stage_all(plan: &MigrationPlan) -> Result<Vec<StagedFile>, MigrateError> {
    let mut staged = Vec::with_capacity(plan.writes.len());
    for write in &plan.writes {
        let renamed_away = plan.renames.iter().any(|r| r.from == write.path);
        match stage(&write.path, &write.content, renamed_away) {
            Ok(file) => staged.push(file),
            Err(err) => {
                discard(&staged);
                return Err(err);
            }
        }
    }
    Ok(staged)
}

fn stage(path: &Path, content: &str, renamed_away: bool) -> Result<StagedFile, MigrateError> {
    stage_with_tmp(path, content, renamed_away, tmp_path(path))
}

fn stage_with_tmp(
    path: &Path,
    content: &str,
    renamed_away: bool,
    tmp: PathBuf,
) -> Result<StagedFile, MigrateError> {
    let previous = if renamed_away {
        None
    } else {
        match std::fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(io_err(path, e)),
        }
    };

    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    if let Err(e) = std::fs::write(&tmp, content) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&tmp, e));
    }
    tracing::debug!("staged: {}", tmp.display());
    Ok(StagedFile {
        path: path.to_path_buf(),
        tmp,
        previous,
    })
}

fn commit(
    plan: &MigrationPlan,
    staged: &[StagedFile],
    journal: &mut Journal,
) -> Result<Vec<WriteResult>, MigrateError> {
    let mut results = Vec::with_capacity(plan.renames.len() + staged.len());

    for rename in &plan.renames {
        if rename.to.exists() {
            tracing::warn!("replacing existing {}", rename.to.display());
        }
        std::fs::rename(&rename.from, &rename.to).map_err(|e| io_err(&rename.from, e))?;
        journal.steps.push(Step::Renamed {
            from: rename.from.clone(),
            to: rename.to.clone(),
        });
        tracing::info!("renamed: {} -> {}", rename.from.display(), rename.to.display());
        results.push(WriteResult::Renamed {
            from: rename.from.clone(),
            to: rename.to.clone(),
        });
    }

    for file in staged {
        if let Some(parent) = file.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        std::fs::rename(&file.tmp, &file.path).map_err(|e| io_err(&file.path, e))?;
        journal.steps.push(Step::Replaced {
            path: file.path.clone(),
            previous: file.previous.clone(),
        });
        tracing::info!("wrote: {}", file.path.display());
        results.push(WriteResult::Written {
            path: file.path.clone(),
        });
    }

    Ok(results)
}

/// Remove tmp files that were not committed.
fn discard(staged: &[StagedFile]) {
    for file in staged {
        if file.tmp.exists() {
            let _ = std::fs::remove_file(&file.tmp);
        }
    }
}

/// Committed steps, in order.
#[derive(Debug, Default)]
struct Journal {
    steps: Vec<Step>,
}

#[derive(Debug)]
enum Step {
    Renamed { from: PathBuf, to: PathBuf },
    Replaced { path: PathBuf, previous: Option<String> },
}

impl Journal {
    /// Undo every step, newest first. Failures are logged and skipped so the
    /// remaining steps still get undone.
    fn roll_back(self) {
        for step in self.steps.into_iter().rev() {
            let outcome = match &step {
                Step::Replaced {
                    path,
                    previous: Some(text),
                } => std::fs::write(path, text),
                Step::Replaced {
                    path,
                    previous: None,
                } => std::fs::remove_file(path),
                Step::Renamed { from, to } => std::fs::rename(to, from),
            };
            match outcome {
                Ok(()) => tracing::debug!("undone: {step:?}"),
                Err(e) => tracing::warn!("could not undo {step:?}: {e}"),
            }
        }
    }
}
