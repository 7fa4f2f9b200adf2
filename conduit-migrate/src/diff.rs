//! Unified diff preview for `conduit diff`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use crate::error::{io_err, MigrateError};
use crate::plan::MigrationPlan;

/// A single planned file change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Compare every planned operation against current on-disk content.
///
/// Renames are shown git-style; writes as unified diffs with paths relative
/// to the workspace root. Files whose content would not change are omitted.
/// No files are written.
pub fn diff_plan(plan: &MigrationPlan) -> Result<Vec<FileDiff>, MigrateError> {
    let mut diffs = Vec::new();

    for rename in &plan.renames {
        diffs.push(FileDiff {
            path: rename.to.clone(),
            unified_diff: format!(
                "rename from {}\nrename to {}\n",
                relative(&plan.root, &rename.from),
                relative(&plan.root, &rename.to)
            ),
        });
    }

    for write in &plan.writes {
        let rendered = normalize_line_endings(&write.content);
        let renamed_away = plan.renames.iter().any(|r| r.from == write.path);
        let existing = if renamed_away {
            String::new()
        } else {
            read_existing_or_empty(&write.path)?
        };
        if existing == rendered {
            continue;
        }

        let rel = relative(&plan.root, &write.path);
        let old_header = if existing.is_empty() {
            "/dev/null".to_string()
        } else {
            format!("a/{rel}")
        };
        let new_header = format!("b/{rel}");
        let unified = TextDiff::from_lines(&existing, &rendered)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            path: write.path.clone(),
            unified_diff: unified,
        });
    }

    Ok(diffs)
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn read_existing_or_empty(path: &Path) -> Result<String, MigrateError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::plan::{PlannedRename, PlannedWrite};

    fn empty_plan(root: &Path) -> MigrationPlan {
        MigrationPlan {
            root: root.to_path_buf(),
            migrated: vec![],
            skipped: vec![],
            renames: vec![],
            writes: vec![],
        }
    }

    #[test]
    fn edited_file_produces_unified_diff() {
        let tmp = TempDir::new().expect("tmp");
        let dir = tmp.path().join("apps/shop");
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(dir.join("project.json"), "{\n  \"name\": \"shop\"\n}\n").expect("write");

        let mut plan = empty_plan(tmp.path());
        plan.writes.push(PlannedWrite {
            path: dir.join("project.json"),
            content: "{\n  \"name\": \"shop\",\n  \"tags\": []\n}\n".to_string(),
        });

        let diffs = diff_plan(&plan).expect("diff");
        assert_eq!(diffs.len(), 1);
        let text = &diffs[0].unified_diff;
        assert!(text.contains("--- a/apps/shop/project.json"), "{text}");
        assert!(text.contains("+++ b/apps/shop/project.json"), "{text}");
        assert!(text.contains("@@"));
        assert!(text.contains("+  \"tags\": []"));
    }

    #[test]
    fn unchanged_file_is_omitted() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("same.js");
        fs::write(&path, "a\r\nb\r\n").expect("write");

        let mut plan = empty_plan(tmp.path());
        plan.writes.push(PlannedWrite {
            path,
            content: "a\nb\n".to_string(),
        });
        assert!(diff_plan(&plan).expect("diff").is_empty());
    }

    #[test]
    fn renamed_config_diffs_against_empty() {
        let tmp = TempDir::new().expect("tmp");
        let config = tmp.path().join("webpack.config.js");
        fs::write(&config, "module.exports = withNx({});\n").expect("write");

        let mut plan = empty_plan(tmp.path());
        plan.renames.push(PlannedRename {
            from: config.clone(),
            to: tmp.path().join("webpack.config.old.js"),
        });
        plan.writes.push(PlannedWrite {
            path: config,
            content: "module.exports = async () => ({});\n".to_string(),
        });

        let diffs = diff_plan(&plan).expect("diff");
        assert_eq!(
            diffs[0].unified_diff,
            "rename from webpack.config.js\nrename to webpack.config.old.js\n"
        );
        assert!(diffs[1].unified_diff.contains("--- /dev/null"));
        assert!(!diffs[1].unified_diff.contains("-module.exports = withNx"));
    }
}
