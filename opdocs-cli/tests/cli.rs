use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("opdocs-core")
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Config whose archive points nowhere; tests always provide an extracted corpus.
fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("aarch64.json");
    fs::write(
        &path,
        r#"{
            "archive": { "url": "http://127.0.0.1:9/none.tar.gz", "name": "none.tar.gz", "subdir": "ISA" },
            "documentation": "https://example.com/docs/",
            "isa": "aarch64"
        }"#,
    )
    .unwrap();
    path
}

#[test]
fn generates_kotlin_table() {
    let work = tempfile::tempdir().unwrap();
    let corpus = work.path().join("input").join("ISA");
    fs::create_dir_all(&corpus).unwrap();
    for name in ["add_addsub_imm.xml", "csel.xml", "broken.xml"] {
        fs::copy(fixture_path(name), corpus.join(name)).unwrap();
    }
    let config = write_config(work.path());
    let output = work.path().join("Aarch64Docs.kt");

    let mut cmd = cargo_bin_cmd!("opdocs");
    cmd.arg("-c")
        .arg(&config)
        .arg("-i")
        .arg(work.path().join("input"))
        .arg("-d")
        .arg(work.path().join("download"))
        .arg("-o")
        .arg(&output);
    let assert = cmd.assert().success();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    let failures: Vec<_> = stderr
        .lines()
        .filter(|line| line.contains("failed to parse document"))
        .collect();
    assert_eq!(failures.len(), 1, "stderr was:\n{stderr}");
    assert!(failures[0].contains("broken"));

    let kotlin = fs::read_to_string(&output).unwrap();
    assert_eq!(kotlin.matches("] = OpCodeDoc(").count(), 2);
    assert!(kotlin.contains("\"https://example.com/docs/CSEL--Conditional-select-\""));
    assert!(!work.path().join("Aarch64Docs.kt.tmp").exists());
}

#[test]
fn inconsistent_corpus_exits_3_without_output() {
    let work = tempfile::tempdir().unwrap();
    let corpus = work.path().join("input").join("ISA");
    // Documents below the corpus root are extracted but cannot be traced back to
    // `<corpus>/<id>.xml`.
    fs::create_dir_all(corpus.join("nested")).unwrap();
    fs::copy(fixture_path("csel.xml"), corpus.join("nested").join("csel.xml")).unwrap();
    let config = write_config(work.path());
    let output = work.path().join("Aarch64Docs.kt");

    let mut cmd = cargo_bin_cmd!("opdocs");
    cmd.arg("-c")
        .arg(&config)
        .arg("-i")
        .arg(work.path().join("input"))
        .arg("-o")
        .arg(&output);
    cmd.assert()
        .code(3)
        .stderr(predicate::str::contains("csel"));

    assert!(!output.exists());
}

#[test]
fn missing_config_file_fails() {
    let work = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("opdocs");
    cmd.arg("-c").arg(work.path().join("absent.json"));
    cmd.assert().code(1);
}

#[test]
fn lists_formats() {
    let mut cmd = cargo_bin_cmd!("opdocs");
    cmd.arg("--list-formats");
    cmd.assert().success().stdout(
        predicate::str::contains("kotlin (.kt)").and(predicate::str::contains("json (.json)")),
    );
}

#[test]
fn json_format_selectable() {
    let work = tempfile::tempdir().unwrap();
    let corpus = work.path().join("input").join("ISA");
    fs::create_dir_all(&corpus).unwrap();
    fs::copy(fixture_path("csel.xml"), corpus.join("csel.xml")).unwrap();
    let config = write_config(work.path());
    let output = work.path().join("table.json");

    let mut cmd = cargo_bin_cmd!("opdocs");
    cmd.arg("-c")
        .arg(&config)
        .arg("-i")
        .arg(work.path().join("input"))
        .arg("-o")
        .arg(&output)
        .arg("-f")
        .arg("json");
    cmd.assert().success();

    let json = fs::read_to_string(&output).unwrap();
    assert!(json.contains("\"key\": \"csel\""));
}
