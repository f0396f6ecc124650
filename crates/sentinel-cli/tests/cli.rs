use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use std::io::Write;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CLEAN_RECORD: &str = r#"
title: "The Lighthouse Keeper"
subtitle: "A Novel"
author: "Mara Quinn"
title_on_cover: "The Lighthouse Keeper"
author_on_cover: "Mara Quinn"
description: "<p>A <b>moving</b> story about a keeper and the storm that changed her island.</p>"
categories: ["Fiction > Literary"]
keywords: ["coastal fiction", "storm survival", "island community"]
language: "English"
book_format: "paperback"
trim_size: "6\" x 9\""
ink_paper: "bw_cream"
page_count: 320
isbn: "978-0-306-40615-7"
"#;

fn cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("sentinel");
    cmd.env_remove("ANTHROPIC_API_KEY")
        .env_remove("SENTINEL_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path.to_str().expect("utf8 path").to_string()
}

#[test]
fn template_prints_empty_record() {
    let out = cmd().arg("template").assert().success().get_output().stdout.clone();
    let record: Value = serde_json::from_slice(&out).expect("valid json output");
    assert_eq!(record["title"], "");
    assert_eq!(record["language"], "English");
    assert_eq!(record["keywords"].as_array().map(Vec::len), Some(7));
}

#[test]
fn template_then_strict_validate_fails_with_status_2() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("book.yaml");
    let path = path.to_str().expect("utf8 path");

    cmd().args(["template", "--out", path]).assert().success();
    assert!(fs::read_to_string(path).expect("template written").contains("title:"));

    cmd()
        .args(["validate", path, "--offline", "--strict"])
        .assert()
        .code(2)
        .stdout(contains("High Risk"))
        .stdout(contains("Title is missing"));
}

#[test]
fn clean_record_passes_strict() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "book.yaml", CLEAN_RECORD);

    cmd()
        .args(["validate", &path, "--offline", "--strict"])
        .assert()
        .success()
        .stdout(contains("Sentinel report: The Lighthouse Keeper"))
        .stdout(contains("Print Book Setup"));
}

#[test]
fn validate_json_output() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "book.yaml", CLEAN_RECORD);

    let out = cmd()
        .args(["validate", &path, "--offline", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: Value = serde_json::from_slice(&out).expect("valid json output");
    assert_eq!(report["validation"]["error_count"], 0);
    assert_eq!(report["validation"]["sections"].as_array().map(Vec::len), Some(5));
    assert!(report.get("ai").is_none());
}

#[test]
fn validate_without_api_key_falls_back_to_rules() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "book.yaml", CLEAN_RECORD);

    cmd()
        .args(["validate", &path])
        .assert()
        .success()
        .stderr(contains("AI review skipped"))
        .stdout(contains("Core Book & Author Details"));
}

#[test]
fn validate_missing_record_fails() {
    cmd()
        .args(["validate", "does-not-exist.yaml", "--offline"])
        .assert()
        .code(1)
        .stderr(contains("Failed to load record"));
}

#[test]
fn validate_rejects_bad_record_type() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "book.json", r#"{"title": 42}"#);

    cmd()
        .args(["validate", &path, "--offline"])
        .assert()
        .code(1)
        .stderr(contains("schema"));
}

#[test]
fn extract_html_manuscript() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "book.html",
        "<html><head><style>p { color: red; }</style></head>\
         <body><h1>Chapter One</h1><p>The storm came at dawn &amp; stayed.</p></body></html>",
    );

    cmd()
        .args(["extract", &path, "--full"])
        .assert()
        .success()
        .stdout(contains("Chapter One"))
        .stdout(contains("The storm came at dawn & stayed."))
        .stdout(contains("color").not());
}

#[test]
fn extract_docx_manuscript() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("book.docx");

    let mut zip = ZipWriter::new(fs::File::create(&path).expect("create docx"));
    zip.start_file("word/document.xml", SimpleFileOptions::default())
        .expect("start entry");
    zip.write_all(
        br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t>Chapter One</w:t></w:r></w:p>
<w:p><w:r><w:t>The storm came at dawn.</w:t></w:r></w:p>
</w:body></w:document>"#,
    )
    .expect("write entry");
    zip.finish().expect("finish docx");

    cmd()
        .args(["extract", path.to_str().expect("utf8 path")])
        .assert()
        .success()
        .stdout(contains("Chapter One\nThe storm came at dawn."));
}

#[test]
fn extract_rejects_corrupt_pdf() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "book.pdf", "%PDF-1.7");

    cmd()
        .args(["extract", &path])
        .assert()
        .code(1)
        .stderr(contains("Could not read 'book.pdf'"));
}

#[test]
fn extract_rejects_unknown_format() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "book.odt", "binary");

    cmd()
        .args(["extract", &path])
        .assert()
        .code(1)
        .stderr(contains("Unsupported manuscript format '.odt'"));
}

#[test]
fn options_lists_trim_sizes() {
    cmd()
        .arg("options")
        .assert()
        .success()
        .stdout(contains("Hardcover"))
        .stdout(contains("6\" x 9\""))
        .stdout(contains("Languages: Afrikaans"));
}

#[test]
fn options_json() {
    let out = cmd()
        .args(["options", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let options: Value = serde_json::from_slice(&out).expect("valid json output");
    assert_eq!(options["formats"].as_array().map(Vec::len), Some(3));
}

#[test]
fn autofill_without_api_key_fails() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "book.txt", &"The keeper climbed the stairs. ".repeat(20));

    cmd()
        .args(["autofill", "--manuscript", &path])
        .assert()
        .code(1)
        .stderr(contains("AI auto-fill is not available"));
}
