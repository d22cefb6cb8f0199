//! E2E tests driving the compiled binary, one JSON batch per line

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_capgains"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn capgains");
    child
        .stdin
        .as_mut()
        .expect("stdin not captured")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");
    child
        .wait_with_output()
        .expect("failed to wait for capgains")
}

#[test]
fn processes_batches_from_stdin() {
    let input = concat!(
        r#"[{"operation":"buy","unit-cost":10.00,"quantity":100},{"operation":"sell","unit-cost":15.00,"quantity":50},{"operation":"sell","unit-cost":15.00,"quantity":50}]"#,
        "\n",
        r#"[{"operation":"buy","unit-cost":10.00,"quantity":10000},{"operation":"sell","unit-cost":20.00,"quantity":5000},{"operation":"sell","unit-cost":5.00,"quantity":5000}]"#,
        "\n",
        "\n",
    );

    let output = run_with_stdin(&["process"], input);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"[{"tax":0},{"tax":0},{"tax":0}]"#,
            r#"[{"tax":0},{"tax":10000},{"tax":0}]"#,
        ]
    );
}

#[test]
fn mixed_case_field_names_are_accepted() {
    let input = concat!(
        r#"[{"Operation":"BUY","Unit-Cost":10.00,"QUANTITY":100}]"#,
        "\n",
    );

    let output = run_with_stdin(&["process"], input);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim(),
        r#"[{"tax":0}]"#
    );
}

#[test]
fn reads_batches_from_a_file() {
    let output = run_with_stdin(&["process", "--input", "tests/data/operations.jsonl"], "");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"[{"tax":0},{"tax":80000}]"#,
            r#"[{"tax":0},{"tax":0}]"#,
        ]
    );
}

#[test]
fn oversell_aborts_with_nonzero_exit() {
    let input = concat!(r#"[{"operation":"sell","unit-cost":10.00,"quantity":1}]"#, "\n");

    let output = run_with_stdin(&["process"], input);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 1"), "stderr: {stderr}");
}

#[test]
fn schema_prints_valid_json() {
    let output = run_with_stdin(&["schema"], "");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let schema: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("schema output is JSON");
    assert_eq!(schema["type"], "array");
}
