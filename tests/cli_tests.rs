//! Command-line integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use vpk_solver::parsing::writer::ContainerBuilder;
use vpk_solver::ArchiveCatalog;

fn cmd() -> Command {
    Command::cargo_bin("vpk-solver").unwrap()
}

fn write_archive(dir: &Path, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
    let bytes = files
        .iter()
        .fold(ContainerBuilder::new(2), |b, (path, data)| b.add_file(path, data))
        .build();
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn sample_archive(dir: &Path) -> PathBuf {
    write_archive(
        dir,
        "pak01_dir.vpk",
        &[
            ("models/props/crate.mdl", b"mdl data"),
            ("materials/props/crate.vmt", b"vmt data"),
        ],
    )
}

fn empty_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("catalog.json");
    ArchiveCatalog::new().save_to_file(&path).unwrap();
    path
}

#[test]
fn test_inspect_text() {
    let dir = TempDir::new().unwrap();
    let archive = sample_archive(dir.path());

    cmd()
        .args(["inspect", "--entries", "--verify-crc"])
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Version: 2"))
        .stdout(predicate::str::contains("Entries: 2"))
        .stdout(predicate::str::contains("0 mismatched"))
        .stdout(predicate::str::contains("models/props/crate.mdl"));
}

#[test]
fn test_inspect_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("junk.vpk");
    std::fs::write(&path, b"definitely not an archive").unwrap();

    cmd()
        .arg("inspect")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad signature"));
}

#[test]
fn test_fingerprint_json() {
    let dir = TempDir::new().unwrap();
    let archive = sample_archive(dir.path());

    let output = cmd()
        .args(["--format", "json", "fingerprint", "--partial"])
        .arg(&archive)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["entry_count"], 2);
    assert_eq!(json["format_version"], 2);
    assert_eq!(json["content_signature"].as_str().unwrap().len(), 32);
    assert_eq!(json["exact_digest"].as_str().unwrap().len(), 64);
    assert!(json["partial_digest"].is_string());
}

#[test]
fn test_fingerprint_without_exact_digest() {
    let dir = TempDir::new().unwrap();
    let archive = sample_archive(dir.path());

    cmd()
        .args(["fingerprint", "--no-exact"])
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exact digest:       -"));
}

#[test]
fn test_fingerprint_rejects_oversized_block() {
    let dir = TempDir::new().unwrap();
    let archive = sample_archive(dir.path());

    cmd()
        .args(["fingerprint", "--partial", "--block-size", "18446744073709551615"])
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--block-size"));

    cmd()
        .args(["fingerprint", "--partial", "--block-size", "67108864"])
        .arg(&archive)
        .assert()
        .success();
}

#[test]
fn test_identify_invalid_archive_exits_2() {
    let dir = TempDir::new().unwrap();
    let catalog = empty_catalog(dir.path());
    let path = dir.path().join("junk.vpk");
    std::fs::write(&path, b"garbage").unwrap();

    cmd()
        .arg("identify")
        .arg(&path)
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid archive"));
}

#[test]
fn test_identify_unknown_archive() {
    let dir = TempDir::new().unwrap();
    let catalog = empty_catalog(dir.path());
    let archive = sample_archive(dir.path());

    cmd()
        .arg("identify")
        .arg(&archive)
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("No matching archive found."));
}

#[test]
fn test_catalog_add_then_identify() {
    let dir = TempDir::new().unwrap();
    let catalog = dir.path().join("catalog.json");
    let archive = sample_archive(dir.path());

    cmd()
        .args(["catalog", "add"])
        .arg(&archive)
        .arg("--catalog")
        .arg(&catalog)
        .args(["--id", "crates-hd", "--name", "HD Crates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added crates-hd"));

    cmd()
        .arg("identify")
        .arg(&archive)
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Match: HD Crates [crates-hd]"))
        .stdout(predicate::str::contains("Certainty: 100%"));

    cmd()
        .args(["catalog", "list", "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1 archives"));
}

#[test]
fn test_catalog_add_refuses_duplicate_id() {
    let dir = TempDir::new().unwrap();
    let catalog = dir.path().join("catalog.json");
    let archive = sample_archive(dir.path());

    let add = |extra: &[&str]| {
        let mut c = cmd();
        c.args(["catalog", "add"])
            .arg(&archive)
            .arg("--catalog")
            .arg(&catalog)
            .args(["--id", "dup"])
            .args(extra);
        c.assert()
    };

    add(&[]).success();
    add(&[]).failure().stderr(predicate::str::contains("already exists"));
    add(&["--force"]).success();
}

#[test]
fn test_repacked_archive_matches_by_signature() {
    let dir = TempDir::new().unwrap();
    let catalog = dir.path().join("catalog.json.gz");
    let original = write_archive(
        dir.path(),
        "original_dir.vpk",
        &[("sound/a.wav", b"aaaa"), ("sound/b.wav", b"bbbb")],
    );
    let repacked = write_archive(
        dir.path(),
        "repacked_dir.vpk",
        &[("sound/b.wav", b"bbbb"), ("sound/a.wav", b"aaaa")],
    );

    cmd()
        .args(["catalog", "add"])
        .arg(&original)
        .arg("--catalog")
        .arg(&catalog)
        .args(["--id", "sounds"])
        .assert()
        .success();

    let output = cmd()
        .args(["--format", "json", "identify"])
        .arg(&repacked)
        .arg("--catalog")
        .arg(&catalog)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["result"]["outcome"], "matched");
    assert_eq!(json["result"]["match_type"], "content-signature");
    assert_eq!(json["result"]["certainty"], 90);
    assert_eq!(json["result"]["candidate"]["id"], "sounds");
}
