use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn converts_text_to_storage() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("notes.txt");
    fs::write(&input_path, "5 > 3 & 2 < 4\n\nStatus: OK\n").unwrap();

    let mut cmd = cargo_bin_cmd!("handoff");
    cmd.arg("convert")
        .arg(input_path.as_os_str())
        .arg("--to")
        .arg("storage");

    cmd.assert().success().stdout(
        "<p>5 &gt; 3 &amp; 2 &lt; 4</p>\n<p>&nbsp;</p>\n<p>Status: OK</p>",
    );
}

#[test]
fn converts_storage_to_text_file() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("page.html");
    let output_path = dir.path().join("page.txt");
    fs::write(
        &input_path,
        "<h2>Shift Notes</h2>\n<ul><li>A</li><li>B &amp; C</li></ul>",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("handoff");
    cmd.arg("convert")
        .arg(input_path.as_os_str())
        .arg("--to")
        .arg("text")
        .arg("-o")
        .arg(output_path.as_os_str());
    cmd.assert().success();

    let written = fs::read_to_string(&output_path).unwrap();
    assert_eq!(written, "Shift Notes\nA\nB & C\n");
}

#[test]
fn explicit_from_overrides_extension() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("page.txt");
    fs::write(&input_path, "<p>plain</p>").unwrap();

    let mut cmd = cargo_bin_cmd!("handoff");
    cmd.arg("convert")
        .arg(input_path.as_os_str())
        .arg("--from")
        .arg("storage")
        .arg("--to")
        .arg("text");

    cmd.assert().success().stdout("plain\n");
}

#[test]
fn unknown_extension_needs_from() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("page.md");
    fs::write(&input_path, "x").unwrap();

    let mut cmd = cargo_bin_cmd!("handoff");
    cmd.arg("convert")
        .arg(input_path.as_os_str())
        .arg("--to")
        .arg("text");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("could not detect format"));
}

#[test]
fn unknown_target_format_is_reported() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("notes.txt");
    fs::write(&input_path, "x").unwrap();

    let mut cmd = cargo_bin_cmd!("handoff");
    cmd.arg("convert")
        .arg(input_path.as_os_str())
        .arg("--to")
        .arg("pdf");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Format 'pdf' not found"));
}
