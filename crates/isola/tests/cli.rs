#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

//! Runs the `isola` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

const MODULE: &str = r#"(module
    (import "env" "log" (func (param i32)))
    (func $double (param i32) (result i32)
        (i32.mul (local.get 0) (i32.const 2))))"#;

fn isola(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_isola"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run isola")
}

fn module_file(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("module.wat");
    std::fs::write(&path, MODULE).unwrap();
    path
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn no_arguments_prints_usage() {
    let output = isola(&[]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage: isola <command>"));
}

#[test]
fn version_matches_package() {
    let output = isola(&["--version"]);
    assert_eq!(
        stdout(&output),
        format!("isola {}\n", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn unknown_command_fails() {
    let output = isola(&["frobnicate"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn info_lists_functions() {
    let dir = tempfile::tempdir().unwrap();
    let path = module_file(&dir);
    let output = isola(&["info", arg(&path)]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains(": valid, 2 functions"), "{text}");
    assert!(text.contains("double  [i32] -> [i32]"), "{text}");
}

#[test]
fn info_on_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = isola(&["info", arg(&dir.path().join("nope.wasm"))]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot find file"));
}

#[test]
fn dump_prints_banner() {
    let dir = tempfile::tempdir().unwrap();
    let path = module_file(&dir);
    let text = stdout(&isola(&["dump", arg(&path)]));
    assert!(text.starts_with("\n===== module text =====\n(module\n"), "{text}");
}

#[test]
fn dump_to_file_has_no_banner() {
    let dir = tempfile::tempdir().unwrap();
    let path = module_file(&dir);
    let out = dir.path().join("out.wat");
    assert!(isola(&["dump", arg(&path), "-o", arg(&out)]).status.success());
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("(module\n  (import \"env\" \"log\""), "{text}");
}

#[test]
fn isolate_prints_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = module_file(&dir);
    let output = isola(&["isolate", arg(&path), "1"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "\
(module
  (func $isolated (param i32) (result i32)
    (i32.mul
      (local.get 0)
      (i32.const 2)
    )
  )
)
"
    );
}

#[test]
fn isolate_emits_valid_wasm() {
    let dir = tempfile::tempdir().unwrap();
    let path = module_file(&dir);
    let out = dir.path().join("double.wasm");
    let output = isola(&["isolate", arg(&path), "1", "--emit=wasm", "-o", arg(&out)]);
    assert!(output.status.success());
    let module = isola::load(&out).unwrap();
    assert!(isola::validate(Some(&module)));
    assert_eq!(isola::function_name(&module, 0), "isolated");
}

#[test]
fn isolate_rejects_imports_and_bad_indices() {
    let dir = tempfile::tempdir().unwrap();
    let path = module_file(&dir);
    for index in ["0", "2", "-1", "x"] {
        let output = isola(&["isolate", arg(&path), index]);
        assert_eq!(output.status.code(), Some(1), "index {index}");
        assert!(output.stdout.is_empty());
    }
}
