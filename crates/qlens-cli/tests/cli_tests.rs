//! End-to-end tests for the `qlens` binary.
//!
//! Each test writes circuit and rule files into a temporary directory and
//! runs the compiled binary against them.

use std::path::Path;
use std::process::{Command, Output};

const GHZ3: &str = r#"{
  "name": "ghz3",
  "num_qubits": 3,
  "gates": [
    {"gate": "h", "qubits": [0]},
    {"gate": "cx", "qubits": [0, 1]},
    {"gate": "cx", "qubits": [1, 2]}
  ]
}"#;

const SERIAL_YAML: &str = "num_qubits: 3
gates:
  - {gate: cx, qubits: [0, 1]}
  - {gate: cx, qubits: [1, 2]}
  - {gate: cx, qubits: [0, 1]}
  - {gate: h, qubits: [0]}
";

fn qlens(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qlens"))
        .args(args)
        .current_dir(dir)
        .env_remove("QLENS_CONFIG")
        .env_remove("QLENS_RULES_FILE")
        .env_remove("QLENS_INCLUDE_GRAPH")
        .env_remove("QLENS_EXPORT_PRETTY")
        .env_remove("QLENS_LOG_LEVEL")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run qlens")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is a JSON report")
}

#[test]
fn analyze_prints_report() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ghz3.json"), GHZ3).unwrap();

    let output = qlens(dir.path(), &["analyze", "--input", "ghz3.json"]);
    assert!(output.status.success(), "{output:?}");

    let report = stdout_json(&output);
    assert_eq!(report["circuit"]["name"], "ghz3");
    assert_eq!(report["features"]["depth"], 3.0);
    assert_eq!(report["features"]["cx_count"], 2.0);
    assert_eq!(report["alerts"].as_array().unwrap().len(), 1);
    assert_eq!(report["alerts"][0]["rule"], "two_qubit_dominance");
    assert!(report.get("graph").is_none());
}

#[test]
fn analyze_writes_graph_and_dot() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ghz3.json"), GHZ3).unwrap();

    let output = qlens(
        dir.path(),
        &[
            "analyze", "-i", "ghz3.json", "--graph", "-o", "report.json", "--dot", "ghz3.dot",
        ],
    );
    assert!(output.status.success(), "{output:?}");
    assert!(output.stdout.is_empty());

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(report["graph"]["edges"].as_array().unwrap().len(), 2);

    let dot = std::fs::read_to_string(dir.path().join("ghz3.dot")).unwrap();
    assert!(dot.contains("digraph"));
    assert_eq!(dot.matches("->").count(), 2, "{dot}");
}

#[test]
fn analyze_fail_on_threshold() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ghz3.json"), GHZ3).unwrap();

    let output = qlens(dir.path(), &["analyze", "-i", "ghz3.json", "--fail-on", "info"]);
    assert!(!output.status.success());

    let output = qlens(dir.path(), &["analyze", "-i", "ghz3.json", "--fail-on", "critical"]);
    assert!(output.status.success(), "{output:?}");
}

#[test]
fn analyze_with_rule_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ghz3.json"), GHZ3).unwrap();
    std::fs::write(
        dir.path().join("rules.yaml"),
        "rules:\n  - name: deep\n    when: depth >= 3\n    severity: critical\n    message: \"depth {depth}\"\n",
    )
    .unwrap();

    let output = qlens(
        dir.path(),
        &["analyze", "-i", "ghz3.json", "--rules", "rules.yaml", "--compact"],
    );
    assert!(output.status.success(), "{output:?}");
    let report = stdout_json(&output);
    assert_eq!(report["alerts"][0]["rule"], "deep");
    assert_eq!(report["alerts"][0]["severity"], "critical");
    assert_eq!(report["alerts"][0]["message"], "depth 3");
}

#[test]
fn analyze_missing_feature_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ghz3.json"), GHZ3).unwrap();
    std::fs::write(
        dir.path().join("rules.yaml"),
        "rules:\n  - name: typo\n    when: cx_cnt > 1\n",
    )
    .unwrap();

    let output = qlens(dir.path(), &["analyze", "-i", "ghz3.json", "-r", "rules.yaml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cx_cnt"), "{stderr}");
}

#[test]
fn analyze_invalid_circuit_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("bad.json"),
        r#"{"num_qubits": 2, "gates": [{"gate": "cx", "qubits": [0, 2]}]}"#,
    )
    .unwrap();

    let output = qlens(dir.path(), &["analyze", "-i", "bad.json"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn compare_ranks_backends() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ghz3.json"), GHZ3).unwrap();
    std::fs::write(dir.path().join("serial.yaml"), SERIAL_YAML).unwrap();

    let output = qlens(
        dir.path(),
        &["compare", "-b", "ibm=serial.yaml", "-b", "iqm=ghz3.json"],
    );
    assert!(output.status.success(), "{output:?}");

    let report = stdout_json(&output);
    assert_eq!(report["comparison"]["backends"]["ibm"]["score"], 4.0);
    assert_eq!(report["comparison"]["backends"]["iqm"]["score"], 2.0);
    assert_eq!(report["ranking"], serde_json::json!(["iqm", "ibm"]));
}

#[test]
fn compare_duplicate_backend_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ghz3.json"), GHZ3).unwrap();

    let output = qlens(
        dir.path(),
        &["compare", "-b", "sim=ghz3.json", "-b", "sim=ghz3.json"],
    );
    assert!(!output.status.success());
}

#[test]
fn rules_lists_defaults_and_yaml() {
    let dir = tempfile::tempdir().unwrap();

    let output = qlens(dir.path(), &["rules"]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("excess_depth"));
    assert!(stdout.contains("two_qubit_dominance"));

    let output = qlens(dir.path(), &["rules", "--yaml"]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("two_qubit_ratio > 0.5"), "{stdout}");
}

#[test]
fn config_file_and_env_precedence() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ghz3.json"), GHZ3).unwrap();
    std::fs::write(dir.path().join("qlens.yaml"), "include_graph: true\n").unwrap();

    let output = qlens(dir.path(), &["analyze", "-i", "ghz3.json", "-c", "qlens.yaml"]);
    assert!(output.status.success(), "{output:?}");
    assert!(stdout_json(&output).get("graph").is_some());

    let output = Command::new(env!("CARGO_BIN_EXE_qlens"))
        .args(["analyze", "-i", "ghz3.json", "-c", "qlens.yaml"])
        .current_dir(dir.path())
        .env("QLENS_INCLUDE_GRAPH", "false")
        .env_remove("QLENS_RULES_FILE")
        .env_remove("QLENS_LOG_LEVEL")
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    assert!(stdout_json(&output).get("graph").is_none());
}

#[test]
fn version_prints_name() {
    let dir = tempfile::tempdir().unwrap();
    let output = qlens(dir.path(), &["version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("qlens"));
}
