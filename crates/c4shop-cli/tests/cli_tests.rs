//! End-to-end tests for the `c4shop` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Temp home for one test, with a settings file that never touches ~/.c4shop.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn settings(&self, content: &str) -> PathBuf {
        let path = self.path().join("settings.json");
        fs::write(&path, content).unwrap();
        path
    }

    fn c4shop(&self) -> Command {
        let mut cmd = Command::cargo_bin("c4shop").unwrap();
        cmd.arg("--settings").arg(self.path().join("settings.json"));
        cmd
    }
}

#[test]
fn export_writes_requested_formats() {
    let fixture = Fixture::new();
    let out = fixture.path().join("out");

    fixture
        .c4shop()
        .args(["export", "--format", "json", "--format", "dsl", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("webshop.json"))
        .stdout(predicate::str::contains("webshop.dsl"));

    let workspace = c4shop_core::storage::read_workspace(&out.join("webshop.json")).unwrap();
    assert_eq!(workspace.model.relationships().count(), 7);
    assert!(workspace.views.view("SystemContext").is_some());
    assert!(workspace.views.view("Containers").is_some());

    let dsl = fs::read_to_string(out.join("webshop.dsl")).unwrap();
    assert!(dsl.contains("container s3 \"Containers\""));
    assert!(dsl.contains("shape WebBrowser"));
}

#[test]
fn export_defaults_come_from_settings() {
    let fixture = Fixture::new();
    let out = fixture.path().join("from-settings");
    fixture.settings(&format!(
        r#"{{"outputDir": {}, "formats": ["dsl"]}}"#,
        serde_json::to_string(&out).unwrap()
    ));

    fixture
        .c4shop()
        .args(["export", "--name", "shop"])
        .assert()
        .success();

    assert!(out.join("shop.dsl").exists());
    assert!(!out.join("shop.json").exists());
}

#[test]
fn compact_export_is_single_line() {
    let fixture = Fixture::new();
    let out = fixture.path().join("out");

    fixture
        .c4shop()
        .args(["export", "--format", "json", "--compact", "--out"])
        .arg(&out)
        .assert()
        .success();

    let json = fs::read_to_string(out.join("webshop.json")).unwrap();
    assert_eq!(json.lines().count(), 1);
}

#[test]
fn unknown_format_is_rejected() {
    let fixture = Fixture::new();
    fixture
        .c4shop()
        .args(["export", "--format", "svg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown export format"));
}

#[test]
fn empty_format_list_fails_without_writing() {
    let fixture = Fixture::new();
    let out = fixture.path().join("out");
    fixture.settings(r#"{"formats": []}"#);

    fixture
        .c4shop()
        .args(["export", "--out"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no export formats configured"));

    assert!(!out.exists());
}

#[test]
fn repeated_formats_are_written_once() {
    let fixture = Fixture::new();
    let out = fixture.path().join("out");

    let output = fixture
        .c4shop()
        .args(["export", "-f", "json", "-f", "dsl", "-f", "json", "--out"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let written: Vec<&str> = stdout.lines().collect();
    assert_eq!(written.len(), 2);
    assert!(written[0].ends_with("webshop.json"));
    assert!(written[1].ends_with("webshop.dsl"));
}

#[test]
fn summary_prints_views() {
    let fixture = Fixture::new();
    fixture
        .c4shop()
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("view SystemContext"))
        .stdout(predicate::str::contains("view Containers"));
}

#[test]
fn schema_is_json() {
    let fixture = Fixture::new();
    let output = fixture.c4shop().arg("schema").output().unwrap();
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["title"], "Workspace");
}

#[test]
fn validate_accepts_export_and_rejects_garbage() {
    let fixture = Fixture::new();
    let out = fixture.path().join("out");
    fixture
        .c4shop()
        .args(["export", "--format", "json", "--out"])
        .arg(&out)
        .assert()
        .success();

    fixture
        .c4shop()
        .arg("validate")
        .arg(out.join("webshop.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("ok (8 elements, 7 relationships, 2 views)"));

    let broken = fixture.path().join("broken.json");
    fs::write(
        &broken,
        r#"{"name":"x","model":{"elements":[{"id":1,"kind":"container","name":"Orphan"}]}}"#,
    )
    .unwrap();
    fixture
        .c4shop()
        .arg("validate")
        .arg(&broken)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no parent system"));
}
