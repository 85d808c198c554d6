//! Headless mode process-level integration harness.
//!
//! # What this covers
//!
//! This harness runs `subroll` as a compiled binary via
//! [`std::process::Command`] and checks what a user or a script piping its
//! output would observe.
//!
//! - **Input**: FILE, `-` and no argument (stdin) all work.
//! - **Formats**: text, json, jsonl and names output, parsed and checked
//!   against the known input.
//! - **Flags**: `--summary`/`--query`, `--explain`, `--normalize-only` with
//!   and without `--in-place`, `--names`/`--no-names` against a fake IVR API.
//! - **Exit codes**: 0 on success; 2 for `--strict` with unparseable blocks
//!   and for usage errors; 1 for I/O errors.
//!
//! # What this does NOT cover
//!
//! - TUI rendering (that requires a real terminal)
//!
//! # Running
//!
//! ```sh
//! cargo test --test headless_harness
//! ```

mod common;
use common::fake_ivr_api::FakeIvrApi;
use common::*;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Run {
    code: i32,
    stdout: String,
    stderr: String,
}

fn subroll_binary(config_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_subroll"));
    // Keep the first-run config file out of the real home directory.
    cmd.env("XDG_CONFIG_HOME", config_home).env_remove("RUST_LOG");
    cmd
}

fn run(args: &[&str], stdin: &str) -> Run {
    let home = tempfile::tempdir().unwrap();
    let mut child = subroll_binary(home.path())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    // Usage errors exit before reading stdin; a broken pipe there is fine.
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    let output = child.wait_with_output().unwrap();
    Run {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8(output.stdout).unwrap(),
        stderr: String::from_utf8(output.stderr).unwrap(),
    }
}

fn paste_file(dir: &Path, text: &str) -> String {
    let path = dir.join("paste.txt");
    std::fs::write(&path, text).unwrap();
    path.to_string_lossy().into_owned()
}

// ---------------------------------------------------------------------------
// Input and text output
// ---------------------------------------------------------------------------

#[test]
fn stdin_text_report() {
    let out = run(&["--headless"], PASTE_PLAIN);
    assert_eq!(out.code, 0, "{}", out.stderr);
    assert_eq!(out.stdout, "    1  user_one\n    4  SomeHandle123\n    7  abcd1234\n");
    assert!(out.stderr.contains("3 hits, 3 users, 0 unparseable"), "{}", out.stderr);
}

#[test]
fn dash_file_and_stdin_agree() {
    let dir = tempfile::tempdir().unwrap();
    let file = paste_file(dir.path(), PASTE_NOISY);
    let from_file = run(&["--headless", &file], "");
    let from_dash = run(&["--headless", "-"], PASTE_NOISY);
    assert_eq!(from_file.stdout, from_dash.stdout);
    assert!(from_file.stdout.contains("   10  !! no recoverable login\n"));
}

#[test]
fn missing_file_exits_one() {
    let out = run(&["--headless", "/definitely/not/here.txt"], "");
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("/definitely/not/here.txt"), "{}", out.stderr);
}

#[test]
fn output_has_no_ansi_codes() {
    let out = run(&["--headless", "--summary"], PASTE_NOISY);
    assert!(!out.stdout.contains('\u{1b}'));
}

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

#[test]
fn json_document_lists_hits_and_errors() {
    let out = run(&["--headless", "--format", "json"], PASTE_NOISY);
    let doc: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    let names: Vec<&str> = doc["hits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["abcd1234", "SomeHandle123", "fan_account_99", "gifter_jp"]);
    assert_eq!(doc["errors"][0]["line"], 10);
    assert_eq!(doc["errors"][0]["kind"], "no_recoverable_token");
    assert!(doc.get("summary").is_none());
}

#[test]
fn jsonl_lines_are_valid_json() {
    let out = run(&["--headless", "--format", "jsonl", "--explain"], PASTE_NOISY);
    let records: Vec<serde_json::Value> = out
        .stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), PASTE_NOISY_EXPECTED.len());
    assert_eq!(records[3]["type"], "error");
    assert_eq!(records[3]["explain"]["text"], "!!! ??");
}

#[test]
fn names_format_prints_bare_logins() {
    let out = run(&["--headless", "--format", "names"], PASTE_REPEATS);
    assert_eq!(out.stdout, "abcd1234\nabcd1234\n");
    let out = run(&["--headless", "--format", "names", "--summary"], PASTE_REPEATS);
    assert_eq!(out.stdout, "abcd1234\n");
}

// ---------------------------------------------------------------------------
// Summary, explain, strict
// ---------------------------------------------------------------------------

#[test]
fn summary_with_query_filters_rows() {
    let paste = PasteBuilder::new()
        .plain("gifter_jp")
        .plain("user_one")
        .noisy("gifter_jp")
        .build();
    let out = run(&["--headless", "--summary", "--query", "ＧＩＦＴ"], &paste.text);
    assert_eq!(out.stdout, "    2  gifter_jp\n");
}

#[test]
fn explain_names_denylist_entries() {
    let out = run(&["--headless", "--explain"], "prime gaming 2024\n\nuser_one\n3日前\n");
    assert!(
        out.stdout
            .contains("    1  !! no recoverable login: \"prime gaming 2024\" [denylist: prime-gaming, prime, gaming, year]"),
        "{}",
        out.stdout
    );
}

#[test]
fn strict_exits_two_on_unparseable_blocks() {
    assert_eq!(run(&["--headless", "--strict"], PASTE_NOISY).code, 2);
    assert_eq!(run(&["--headless", "--strict"], PASTE_PLAIN).code, 0);
    assert_eq!(run(&["--headless"], PASTE_NOISY).code, 0);
}

// ---------------------------------------------------------------------------
// Normalize-only
// ---------------------------------------------------------------------------

#[test]
fn normalize_only_prints_repaired_text() {
    let out = run(&["--headless", "--normalize-only"], PASTE_HALF);
    assert_eq!(out.stdout, "user_one\n3日前\n\nlast_login\n○日前\n\n");
}

#[test]
fn in_place_rewrites_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = paste_file(dir.path(), PASTE_CRLF);
    let out = run(&["--headless", "--normalize-only", "--in-place", &file], "");
    assert_eq!(out.code, 0, "{}", out.stderr);
    assert_eq!(out.stdout, "");
    assert_eq!(
        std::fs::read_to_string(&file).unwrap(),
        "user_one\n3日前\n\nuser_two\n5日前\n\n"
    );
}

#[test]
fn in_place_on_stdin_is_an_error() {
    let out = run(&["--headless", "--normalize-only", "--in-place"], PASTE_HALF);
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("--in-place"), "{}", out.stderr);
}

// ---------------------------------------------------------------------------
// Usage errors
// ---------------------------------------------------------------------------

#[test]
fn headless_only_flags_need_headless() {
    assert_eq!(run(&["--format", "json"], "").code, 2);
    assert_eq!(run(&["--headless", "--in-place"], "").code, 2);
    assert_eq!(run(&["--headless", "--query", "x"], "").code, 2);
    assert_eq!(run(&["--names"], "").code, 2);
}

#[test]
fn unknown_flag_exits_two() {
    assert_eq!(run(&["--headless", "--frobnicate"], "").code, 2);
}

// ---------------------------------------------------------------------------
// Display names
// ---------------------------------------------------------------------------

fn names_config(dir: &Path, api: &FakeIvrApi) -> String {
    let path = dir.join("config.toml");
    std::fs::write(
        &path,
        format!("[lookup]\nbase_url = \"{}\"\ntimeout_ms = 2000\n", api.base_url()),
    )
    .unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn names_flag_labels_logins() {
    let api = FakeIvrApi::start_blocking(DISPLAY_NAMES);
    let dir = tempfile::tempdir().unwrap();
    let config = names_config(dir.path(), &api);

    let out = run(&["--headless", "--names", "--config", &config], PASTE_PLAIN);
    assert_eq!(out.code, 0, "{}", out.stderr);
    assert_eq!(
        out.stdout,
        "    1  user_one\n    4  SomeHandle123\n    7  abcd1234（アブシディ）\n"
    );
}

#[test]
fn names_filter_matches_display_name() {
    let api = FakeIvrApi::start_blocking(DISPLAY_NAMES);
    let dir = tempfile::tempdir().unwrap();
    let config = names_config(dir.path(), &api);

    let args = ["--headless", "--names", "--config", &config, "--summary", "--query", "ぎふ"];
    let out = run(&args, PASTE_NOISY);
    assert_eq!(out.stdout, "    1  gifter_jp（ギフター）\n");
}

#[test]
fn no_names_wins_over_names() {
    let api = FakeIvrApi::start_blocking(DISPLAY_NAMES);
    let dir = tempfile::tempdir().unwrap();
    let config = names_config(dir.path(), &api);

    let out = run(&["--headless", "--names", "--no-names", "--config", &config], PASTE_PLAIN);
    assert_eq!(out.stdout, "    1  user_one\n    4  SomeHandle123\n    7  abcd1234\n");
}
