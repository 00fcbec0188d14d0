//! Integration tests for top-level CLI behavior.

use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::json;

use lazylink::cassette::recorder::CassetteRecorder;

fn lazylink() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_lazylink"));
    command
        .env_remove("LAZYLINK_RECORD")
        .env_remove("LAZYLINK_REPLAY")
        .env("LAZYLINK_LOG", "error");
    command
}

fn run_lazylink(args: &[&str]) -> std::process::Output {
    lazylink().args(args).output().expect("failed to run lazylink binary")
}

fn run_with_stdin(args: &[&str], input: &str) -> std::process::Output {
    let mut child = lazylink()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn lazylink binary");
    child.stdin.take().unwrap().write_all(input.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn encode_prints_one_link_per_line() {
    let output = run_lazylink(&[
        "encode",
        "--path",
        "/tests/@id",
        "--identified-by",
        "id",
        "--related",
        "children",
        "--value",
        "id=4567",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        ["</tests/4567>; rel=\"self\"", "</tests/4567/children>; rel=\"related\"; anchor=\"#children\""]
    );
}

#[test]
fn encode_item_chains_anchors() {
    let output = run_lazylink(&[
        "encode", "--item", "--path", "/tests/@id", "--identified-by", "id", "--detached",
        "owner=/users/@owner", "--value", "id=1", "--value", "owner=7",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("</tests/1>; rel=\"item\"; anchor=\"#1\""));
    assert!(stdout.contains("</users/7>; rel=\"related\"; anchor=\"/tests/1#owner\""));
}

#[test]
fn encode_missing_value_fails() {
    let output = run_lazylink(&["encode", "--path", "/tests/@id", "--identified-by", "id"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("@id"));
}

#[test]
fn correlate_reads_stdin() {
    let input = "</a/1>; rel=\"item\"; anchor=\"#1\"\n</a/1/b>; rel=\"related\"; anchor=\"/a/1#b\"\n";
    let output = run_with_stdin(&["correlate", "--multiple"], input);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, json!({"1": {"b": "/a/1/b"}}));
}

#[test]
fn fetch_replays_from_cassette() {
    let dir = std::env::temp_dir().join("lazylink_cli_fetch_test");
    let _ = std::fs::remove_dir_all(&dir);
    let cassette = dir.join("fetch.cassette.yaml");

    let mut recorder = CassetteRecorder::new(&cassette, "cli");
    recorder.record(
        "json",
        "http://dummy/tests/1",
        json!({"Ok": {
            "links": ["<http://dummy/tests/1/children>; rel=\"related\"; anchor=\"#children\""],
            "body": {"id": 1}
        }}),
    );
    recorder.finish().unwrap();

    let output = lazylink()
        .args(["fetch", "http://dummy/tests/1"])
        .env("LAZYLINK_REPLAY", &cassette)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, json!({"body": {"id": 1}, "links": {"children": "http://dummy/tests/1/children"}}));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn fetch_rejects_relative_url() {
    let output = run_lazylink(&["fetch", "/tests/1"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("URL must be absolute but /tests/1 was passed"));
}

#[test]
fn conflicting_cassette_settings_fail() {
    let output = lazylink()
        .args(["fetch", "http://dummy/tests/1"])
        .env("LAZYLINK_RECORD", "a.yaml")
        .env("LAZYLINK_REPLAY", "b.yaml")
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("mutually exclusive"));
}

#[test]
fn help_lists_subcommands() {
    let output = run_lazylink(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("encode"));
    assert!(stdout.contains("correlate"));
    assert!(stdout.contains("fetch"));
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let output = run_lazylink(&["nonsense"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}
