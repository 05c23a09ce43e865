use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use h2f_lib::H2fOutput;
use tempfile::TempDir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("page.json")
}

/// Run the binary with HOME pointed at an empty directory so a developer's
/// central config never leaks into the test.
fn run_h2f(home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_h2f"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("H2F_MOCK_CAPTURE")
        .env_remove("RUST_LOG")
        .output()
        .expect("run h2f")
}

fn parse_json(stdout: &[u8]) -> serde_json::Value {
    serde_json::from_slice(stdout).expect("stdout is JSON")
}

#[test]
fn extract_exit_code_passes_for_fixture() {
    let home = TempDir::new().expect("tempdir");
    let input = fixture();
    let out = run_h2f(&home, &["extract", "--input", input.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let body: H2fOutput = serde_json::from_slice(&out.stdout).expect("parse output");
    match body {
        H2fOutput::Extract(out) => {
            assert_eq!(out.stats.node_count, 12);
            assert_eq!(out.stats.image_count, 1);
            assert!(!out.stats.oversize);
            assert_eq!(out.data.tree.tag_name, "body");
            assert_eq!(out.fonts_to_load.len(), 3);
        }
        other => panic!("expected extract output, got {other:?}"),
    }
}

#[test]
fn extract_writes_output_file() {
    let home = TempDir::new().expect("tempdir");
    let dir = TempDir::new().expect("tempdir");
    let target = dir.path().join("tree.json");
    let input = fixture();
    let out = run_h2f(
        &home,
        &[
            "extract",
            "--input",
            input.to_str().unwrap(),
            "--selector",
            ".card.featured",
            "--output",
            target.to_str().unwrap(),
        ],
    );

    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
    let written = parse_json(&std::fs::read(&target).expect("read output"));
    assert_eq!(written["mode"], "extract");
    assert_eq!(written["data"]["tree"]["tagName"], "div");
    assert_eq!(written["stats"]["nodeCount"], 5);
}

#[test]
fn missing_root_is_fatal_no_content() {
    let home = TempDir::new().expect("tempdir");
    let input = fixture();
    let out = run_h2f(
        &home,
        &["extract", "--input", input.to_str().unwrap(), "--selector", "#nope"],
    );

    assert_eq!(out.status.code(), Some(2));
    let body = parse_json(&out.stdout);
    assert_eq!(body["mode"], "error");
    assert_eq!(body["error"]["code"], "NO_CONTENT");
    assert_eq!(body["error"]["details"]["selector"], "#nope");
}

#[test]
fn invalid_selector_is_reported() {
    let home = TempDir::new().expect("tempdir");
    let input = fixture();
    let out = run_h2f(
        &home,
        &["extract", "--input", input.to_str().unwrap(), "--selector", "div > p"],
    );

    assert_eq!(out.status.code(), Some(2));
    assert_eq!(parse_json(&out.stdout)["error"]["code"], "INVALID_SELECTOR");
}

#[test]
fn oversize_exits_one_with_memory_error() {
    let home = TempDir::new().expect("tempdir");
    let input = fixture();
    let out = run_h2f(
        &home,
        &["extract", "--input", input.to_str().unwrap(), "--max-bytes", "100"],
    );

    assert_eq!(out.status.code(), Some(1));
    let body = parse_json(&out.stdout);
    assert_eq!(body["mode"], "error");
    assert_eq!(body["error"]["code"], "MEMORY_ERROR");
    assert_eq!(body["error"]["details"]["maxSize"], 100);
}

#[test]
fn allow_oversize_still_emits_data() {
    let home = TempDir::new().expect("tempdir");
    let input = fixture();
    let out = run_h2f(
        &home,
        &[
            "extract",
            "--input",
            input.to_str().unwrap(),
            "--max-bytes=100",
            "--allow-oversize",
        ],
    );

    assert_eq!(out.status.code(), Some(1));
    let body = parse_json(&out.stdout);
    assert_eq!(body["mode"], "extract");
    assert_eq!(body["stats"]["oversize"], true);
    assert_eq!(body["stats"]["maxBytes"], 100);
}

#[test]
fn config_file_sets_defaults_and_flags_override() {
    let home = TempDir::new().expect("tempdir");
    let dir = TempDir::new().expect("tempdir");
    let cfg = dir.path().join("h2f.toml");
    std::fs::write(&cfg, "[extraction]\nselector = \"main\"\nmax_depth = 1\n").expect("write config");
    let input = fixture();

    let out = run_h2f(
        &home,
        &[
            "extract",
            "--input",
            input.to_str().unwrap(),
            "--config",
            cfg.to_str().unwrap(),
        ],
    );
    assert_eq!(out.status.code(), Some(0));
    let body = parse_json(&out.stdout);
    assert_eq!(body["data"]["tree"]["tagName"], "main");
    assert_eq!(body["stats"]["nodeCount"], 3);

    let out = run_h2f(
        &home,
        &[
            "extract",
            "--input",
            input.to_str().unwrap(),
            "--config",
            cfg.to_str().unwrap(),
            "--selector",
            "header",
        ],
    );
    assert_eq!(out.status.code(), Some(0));
    let body = parse_json(&out.stdout);
    assert_eq!(body["data"]["tree"]["tagName"], "header");
    assert_eq!(body["stats"]["nodeCount"], 3);
}

#[test]
fn invalid_config_is_config_error() {
    let home = TempDir::new().expect("tempdir");
    let dir = TempDir::new().expect("tempdir");
    let cfg = dir.path().join("h2f.toml");
    std::fs::write(&cfg, "[limits]\nmax_output_bytes = 0\n").expect("write config");
    let input = fixture();

    let out = run_h2f(
        &home,
        &[
            "extract",
            "--input",
            input.to_str().unwrap(),
            "--config",
            cfg.to_str().unwrap(),
        ],
    );
    assert_eq!(out.status.code(), Some(2));
    let body = parse_json(&out.stdout);
    assert_eq!(body["error"]["code"], "CONFIG_ERROR");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap_or_default()
        .contains("max_output_bytes"));
}

#[test]
fn missing_and_malformed_input_are_fatal() {
    let home = TempDir::new().expect("tempdir");
    let dir = TempDir::new().expect("tempdir");

    let out = run_h2f(&home, &["extract", "--input", "/definitely/missing.json"]);
    assert_eq!(out.status.code(), Some(2));
    assert_eq!(parse_json(&out.stdout)["error"]["code"], "CONFIG_ERROR");

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{\"root\": ").expect("write broken snapshot");
    let out = run_h2f(&home, &["extract", "--input", broken.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(2));
    assert_eq!(parse_json(&out.stdout)["error"]["code"], "PARSE_ERROR");
}

#[test]
fn capture_uses_mock_snapshot() {
    let home = TempDir::new().expect("tempdir");
    let out = Command::new(env!("CARGO_BIN_EXE_h2f"))
        .args([
            "capture",
            "--url",
            "https://example.com/landing?token=secret",
        ])
        .env("HOME", home.path())
        .env("H2F_MOCK_CAPTURE", fixture())
        .output()
        .expect("run h2f");

    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let body = parse_json(&out.stdout);
    assert_eq!(body["source"]["kind"], "url");
    assert_eq!(body["source"]["value"], "https://example.com/landing");
    assert_eq!(body["stats"]["nodeCount"], 12);
}

#[test]
fn capture_rejects_invalid_url() {
    let home = TempDir::new().expect("tempdir");
    let out = run_h2f(&home, &["capture", "--url", "not a url"]);

    assert_eq!(out.status.code(), Some(2));
    assert_eq!(parse_json(&out.stdout)["error"]["code"], "CONFIG_ERROR");
}

#[test]
fn pretty_format_to_pipe_is_indented_json() {
    let home = TempDir::new().expect("tempdir");
    let input = fixture();
    let out = run_h2f(
        &home,
        &["extract", "--input", input.to_str().unwrap(), "--format", "pretty"],
    );

    assert_eq!(out.status.code(), Some(0));
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.starts_with("{\n  \"mode\": \"extract\""));
}
