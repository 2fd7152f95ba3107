//! Integration tests for the command-line host

use std::path::PathBuf;
use std::process::Command;

fn run_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_cellcalc"))
        // Tests must not depend on a user's config.toml.
        .arg("--config")
        .arg(empty_config())
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "cellcalc_cli_{}_{:?}_{}",
        std::process::id(),
        std::thread::current().id(),
        name
    ))
}

fn empty_config() -> PathBuf {
    let path = temp_path("config.toml");
    std::fs::write(&path, "").unwrap();
    path
}

struct Cleanup(Vec<PathBuf>);
impl Drop for Cleanup {
    fn drop(&mut self) {
        for path in &self.0 {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[test]
fn test_basic_arithmetic() {
    let (stdout, _, code) = run_command(&["-c", "5 + 3"]);
    assert_eq!(stdout.trim(), "8");
    assert_eq!(code, 0);
}

#[test]
fn test_precedence_and_functions() {
    let (stdout, _, code) = run_command(&["-c", "2 + 3 * 4 - max(1; 2; 3)"]);
    assert_eq!(stdout.trim(), "11");
    assert_eq!(code, 0);
}

#[test]
fn test_auto_prepend_equals() {
    let (stdout1, _, _) = run_command(&["-c", "10 + 5"]);
    let (stdout2, _, _) = run_command(&["-c", "=10 + 5"]);
    assert_eq!(stdout1, stdout2);
}

#[test]
fn test_division_by_zero_is_zero() {
    let (stdout, _, code) = run_command(&["-c", "1/0"]);
    assert_eq!(stdout.trim(), "0");
    assert_eq!(code, 0);
}

#[test]
fn test_error_exit_code() {
    let (stdout, stderr, code) = run_command(&["-c", "(1 + 2"]);
    assert!(stdout.starts_with("#ERR"));
    assert!(stderr.contains("Error"));
    assert_eq!(code, 1);
}

#[test]
fn test_strict_flag_rejects_unknown_names() {
    let (stdout, _, code) = run_command(&["-c", "avg(2) * 3"]);
    assert_eq!(stdout.trim(), "6");
    assert_eq!(code, 0);

    let (stdout, _, code) = run_command(&["--strict", "-c", "avg(2) * 3"]);
    assert!(stdout.starts_with("#ERR"));
    assert_eq!(code, 1);
}

#[test]
fn test_set_cells_then_evaluate() {
    let (stdout, _, code) = run_command(&["-s", "A1=4", "-s", "B1==A1*2", "-c", "B1 + 1"]);
    assert_eq!(stdout.trim(), "9");
    assert_eq!(code, 0);
}

#[test]
fn test_load_file_prints_sheet() {
    let sheet = temp_path("sheet.grd");
    let _cleanup = Cleanup(vec![sheet.clone()]);
    std::fs::write(&sheet, "A1: 2\nA2: \"label\"\nB1: =A1 ^ 3\nB2: =round(B1 / 3; 2)\n").unwrap();

    let (stdout, _, code) = run_command(&[sheet.to_str().unwrap()]);
    assert_eq!(code, 0);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines, vec!["A1: 2", "B1: 8", "A2: label", "B2: 2.67"]);
}

#[test]
fn test_output_writes_json_snapshot() {
    let out = temp_path("out.json");
    let _cleanup = Cleanup(vec![out.clone()]);

    let (_, _, code) = run_command(&["-s", "A1=3", "-s", "A2==A1+1", "-o", out.to_str().unwrap()]);
    assert_eq!(code, 0);

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("\"tokens\""));

    let (stdout, _, code) = run_command(&[out.to_str().unwrap(), "-c", "A2 * 10"]);
    assert_eq!(stdout.trim(), "40");
    assert_eq!(code, 0);
}

#[test]
fn test_unknown_option() {
    let (_, stderr, code) = run_command(&["--bogus"]);
    assert!(stderr.contains("Unknown option"));
    assert_eq!(code, 1);
}
