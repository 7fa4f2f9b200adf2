use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn conduit_cmd(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("conduit"));
    cmd.arg("--workspace").arg(root).env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, body).expect("write");
}

fn shop_workspace() -> TempDir {
    let tmp = TempDir::new().expect("tempdir");
    write(
        tmp.path(),
        "apps/shop/project.json",
        r#"{
  "name": "shop",
  "targets": {
    "build": {
      "executor": "@nx/webpack:webpack",
      "group": "build",
      "options": { "webpackConfig": "apps/shop/webpack.config.js" },
      "configurations": { "production": {} }
    },
    "test": { "executor": "@nx/jest:jest" },
    "lint": { "executor": "@nx/eslint:lint", "group": "build" }
  }
}
"#,
    );
    write(
        tmp.path(),
        "apps/shop/webpack.config.js",
        "const { composePlugins, withNx } = require('@nx/webpack');\nmodule.exports = composePlugins(withNx({ outputPath: './dist' }), (c) => c);\n",
    );
    write(
        tmp.path(),
        "libs/ui/project.json",
        r#"{ "targets": { "test": { "executor": "@nx/jest:jest" } } }"#,
    );
    tmp
}

#[test]
fn projects_lists_every_project() {
    let ws = shop_workspace();
    conduit_cmd(ws.path())
        .arg("projects")
        .assert()
        .success()
        .stdout(contains("shop"))
        .stdout(contains("libs/ui"));
}

#[test]
fn projects_json_has_counts() {
    let ws = shop_workspace();
    let output = conduit_cmd(ws.path())
        .args(["projects", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(rows[0]["name"], "shop");
    assert_eq!(rows[0]["targets"], 3);
    assert_eq!(rows[0]["groups"], 1);
    assert_eq!(rows[1]["name"], "ui");
    assert_eq!(rows[1]["groups"], 0);
}

#[test]
fn targets_prints_groups_then_others() {
    let ws = shop_workspace();
    let output = conduit_cmd(ws.path())
        .args(["targets", "shop"])
        .env("NO_COLOR", "1")
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let build = stdout.find("build (2)").expect("build group heading");
    let others = stdout.find("Others (1)").expect("others heading");
    assert!(build < others, "{stdout}");
    assert!(stdout.contains("[production]"));
}

#[test]
fn targets_json_is_grouped_tree() {
    let ws = shop_workspace();
    let output = conduit_cmd(ws.path())
        .args(["targets", "shop", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(tree["layout"], "grouped");
    assert_eq!(tree["entries"][0]["heading"]["label"], "build");
    assert_eq!(tree["entries"][0]["count"], 2);
    assert_eq!(tree["entries"][1]["heading"]["kind"], "others");
    assert_eq!(tree["entries"][1]["items"][0]["target"], "test");
}

#[test]
fn targets_without_groups_is_flat() {
    let ws = shop_workspace();
    conduit_cmd(ws.path())
        .args(["targets", "ui", "--json"])
        .assert()
        .success()
        .stdout(contains("\"layout\": \"flat\""));
}

#[test]
fn unknown_project_fails() {
    let ws = shop_workspace();
    conduit_cmd(ws.path())
        .args(["targets", "nope"])
        .assert()
        .failure()
        .stderr(contains("project 'nope' not found"));
}

#[test]
fn migrate_dry_run_changes_nothing() {
    let ws = shop_workspace();
    let before = fs::read_to_string(ws.path().join("apps/shop/webpack.config.js")).expect("read");

    conduit_cmd(ws.path())
        .args(["migrate", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("[dry-run]"))
        .stdout(contains("shop:build"));

    let after = fs::read_to_string(ws.path().join("apps/shop/webpack.config.js")).expect("read");
    assert_eq!(before, after);
    assert!(!ws.path().join("apps/shop/webpack.config.old.js").exists());
}

#[test]
fn migrate_writes_plugin_config() {
    let ws = shop_workspace();
    conduit_cmd(ws.path())
        .arg("migrate")
        .assert()
        .success()
        .stdout(contains("migrated 1 target(s)"));

    let config = fs::read_to_string(ws.path().join("apps/shop/webpack.config.js")).expect("read");
    assert!(config.contains("\"outputPath\": \"apps/shop/dist\""), "{config}");
    assert!(ws.path().join("apps/shop/webpack.config.old.js").exists());
    let project = fs::read_to_string(ws.path().join("apps/shop/project.json")).expect("read");
    assert!(project.contains("\"standardWebpackConfigFunction\": true"));
}

#[test]
fn migrate_with_no_candidates_fails_without_writing() {
    let ws = TempDir::new().expect("tempdir");
    let body = r#"{ "targets": { "build": { "executor": "@nx/js:tsc" } } }"#;
    write(ws.path(), "libs/core/project.json", body);

    conduit_cmd(ws.path())
        .arg("migrate")
        .assert()
        .failure()
        .stderr(contains("could not find any projects to migrate"));

    assert_eq!(
        fs::read_to_string(ws.path().join("libs/core/project.json")).expect("read"),
        body
    );
}

#[test]
fn diff_previews_without_writing() {
    let ws = shop_workspace();
    conduit_cmd(ws.path())
        .arg("diff")
        .assert()
        .success()
        .stdout(contains("rename from apps/shop/webpack.config.js"))
        .stdout(contains("+++ b/apps/shop/project.json"))
        .stdout(contains("standardWebpackConfigFunction").count(1));
    assert!(!ws.path().join("apps/shop/webpack.config.old.js").exists());
}
