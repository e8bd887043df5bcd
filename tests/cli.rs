//! End-to-end tests for the `schema-studio` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use studio_ir::{Entity, SchemaDocument, load_schema, save_schema};
use tempfile::TempDir;

fn studio() -> Command {
    let mut cmd = Command::cargo_bin("schema-studio").unwrap();
    cmd.env_remove("SCHEMA_STUDIO_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn write_script(dir: &Path, steps: serde_json::Value) -> PathBuf {
    let path = dir.join("script.json");
    std::fs::write(&path, serde_json::to_string_pretty(&steps).unwrap()).unwrap();
    path
}

fn shop_file(dir: &Path) -> PathBuf {
    let path = dir.join("shop.json");
    save_schema(&SchemaDocument::new("Shop"), &path).unwrap();
    path
}

#[test]
fn test_new_writes_schema_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("shop.json");

    studio()
        .args(["new", "Shop", "--description", "Orders and customers", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created schema 'Shop'"));

    let doc = load_schema(&path).unwrap();
    assert_eq!(doc.name, "Shop");
    assert_eq!(doc.description, "Orders and customers");

    studio()
        .args(["new", "Shop", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_info_reports_counts() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("shop.json");
    let doc = SchemaDocument::new("Shop")
        .with_entity(Entity::new("Customer"))
        .with_entity(Entity::new("Order"));
    save_schema(&doc, &path).unwrap();

    studio()
        .arg("info")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Shop"))
        .stdout(predicate::str::contains("Customer (1 fields)"))
        .stdout(predicate::str::contains("(not saved)"));
}

#[test]
fn test_info_missing_file() {
    studio()
        .args(["info", "/nonexistent/shop.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open"));
}

#[test]
fn test_validate_fails_on_blank_name() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("blank.json");
    save_schema(&SchemaDocument::new(""), &path).unwrap();

    studio()
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation error"));
}

#[test]
fn test_validate_passes_valid_schema() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("shop.json");
    let doc = SchemaDocument::new("Shop")
        .with_description("Orders")
        .with_entity(Entity::new("Customer"));
    save_schema(&doc, &path).unwrap();

    studio()
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn test_signature_ignores_server_timestamps() {
    let temp_dir = TempDir::new().unwrap();
    let plain = temp_dir.path().join("plain.json");
    let stamped = temp_dir.path().join("stamped.json");

    let doc = SchemaDocument::new("Shop").with_entity(Entity::new("Customer").with_id("c1"));
    save_schema(&doc, &plain).unwrap();

    let mut value = serde_json::to_value(&doc).unwrap();
    value["updatedAt"] = serde_json::json!("2026-10-01T12:00:00Z");
    value["lastModified"] = serde_json::json!("2026-10-01T12:00:00Z");
    let touched: SchemaDocument = serde_json::from_value(value).unwrap();
    save_schema(&touched, &stamped).unwrap();

    let first = studio().arg("signature").arg(&plain).output().unwrap();
    let second = studio().arg("signature").arg(&stamped).output().unwrap();
    assert!(first.status.success());
    assert!(!first.stdout.is_empty());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_replay_autosaves_after_quiet_period() {
    let temp_dir = TempDir::new().unwrap();
    let file = shop_file(temp_dir.path());
    let script = write_script(
        temp_dir.path(),
        serde_json::json!([
            {"step": "edit", "edit": {"op": "add_entity", "name": "Customer"}},
            {"step": "edit", "edit": {"op": "add_entity", "name": "Order"}},
            {"step": "edit", "edit": {"op": "add_relationship", "from": "Customer", "to": "Order"}},
            {"step": "wait", "ms": 400}
        ]),
    );

    studio()
        .arg("replay")
        .arg(&file)
        .arg("--script")
        .arg(&script)
        .args(["--delay-ms", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved Shop"))
        .stdout(predicate::str::contains("4 entries, cursor 3"));

    let saved = load_schema(&file).unwrap();
    assert_eq!(saved.entity_count(), 2);
    assert_eq!(saved.relationship_count(), 1);
    let id = saved.schema_id.unwrap();
    assert_eq!(id.len(), 6);
}

#[test]
fn test_replay_undo_redo_and_history_bound() {
    let temp_dir = TempDir::new().unwrap();
    let file = shop_file(temp_dir.path());
    let script = write_script(
        temp_dir.path(),
        serde_json::json!([
            {"step": "edit", "edit": {"op": "add_entity", "name": "A"}},
            {"step": "edit", "edit": {"op": "add_entity", "name": "B"}},
            {"step": "edit", "edit": {"op": "add_entity", "name": "C"}},
            {"step": "edit", "edit": {"op": "add_entity", "name": "D"}},
            {"step": "undo"},
            {"step": "undo"},
            {"step": "undo"},
            {"step": "edit", "edit": {"op": "add_entity", "name": "E"}},
            {"step": "redo"}
        ]),
    );

    studio()
        .arg("replay")
        .arg(&file)
        .arg("--script")
        .arg(&script)
        .args(["--max-history", "3", "--delay-ms", "60000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to undo"))
        .stdout(predicate::str::contains("nothing to redo"))
        .stdout(predicate::str::contains("2 entries, cursor 1"));

    // Closing the session flushes the final state
    let saved = load_schema(&file).unwrap();
    let names: Vec<_> = saved.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "E"]);
}

#[test]
fn test_replay_skips_blank_name() {
    let temp_dir = TempDir::new().unwrap();
    let file = shop_file(temp_dir.path());
    let script = write_script(
        temp_dir.path(),
        serde_json::json!([
            {"step": "edit", "edit": {"op": "rename_schema", "name": ""}},
            {"step": "flush"}
        ]),
    );

    studio()
        .arg("replay")
        .arg(&file)
        .arg("--script")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("not saveable"))
        .stdout(predicate::str::contains("Saved").not());

    assert_eq!(load_schema(&file).unwrap().name, "Shop");
}

#[test]
fn test_replay_without_autosave_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let file = shop_file(temp_dir.path());
    let before = std::fs::read_to_string(&file).unwrap();
    let script = write_script(
        temp_dir.path(),
        serde_json::json!([
            {"step": "edit", "edit": {"op": "add_entity", "name": "Customer"}},
            {"step": "flush"}
        ]),
    );

    studio()
        .arg("replay")
        .arg(&file)
        .arg("--script")
        .arg(&script)
        .arg("--no-autosave")
        .assert()
        .success()
        .stdout(predicate::str::contains("autosave disabled"));

    assert_eq!(std::fs::read_to_string(&file).unwrap(), before);
}

#[test]
fn test_replay_reports_rejected_edit() {
    let temp_dir = TempDir::new().unwrap();
    let file = shop_file(temp_dir.path());
    let script = write_script(
        temp_dir.path(),
        serde_json::json!([
            {"step": "edit", "edit": {"op": "delete_entity", "entity": "Ghost"}}
        ]),
    );

    studio()
        .arg("replay")
        .arg(&file)
        .arg("--script")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Edit rejected"))
        .stdout(predicate::str::contains("1 entries, cursor 0"));
}

#[test]
fn test_replay_reads_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = shop_file(temp_dir.path());
    let config = temp_dir.path().join("studio.toml");
    std::fs::write(&config, "[history]\nmax_size = 0\n").unwrap();
    let script = write_script(temp_dir.path(), serde_json::json!([]));

    studio()
        .arg("replay")
        .arg(&file)
        .arg("--script")
        .arg(&script)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_size"));
}
