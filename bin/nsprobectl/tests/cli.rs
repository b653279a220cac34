//! ---
//! nsp_section: "07-interfaces"
//! nsp_subsection: "integration-tests"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "End-to-end checks of the control CLI."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use std::fs;

use assert_cmd::Command;

fn nsprobectl(workdir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("nsprobectl").expect("binary built");
    cmd.current_dir(workdir)
        .env_remove("NSPROBE_CONFIG")
        .env("NSPROBE_LOG", "warn");
    cmd
}

#[test]
fn contexts_lists_every_execution_context() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = nsprobectl(temp.path())
        .arg("contexts")
        .output()
        .expect("run contexts");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["primary-ui", "secondary-ui", "unmanaged-pool", "immediate"] {
        assert!(stdout.contains(name), "missing {name} in {stdout}");
    }
}

#[test]
fn default_run_passes_in_every_context() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = nsprobectl(temp.path())
        .args(["run", "--json"])
        .output()
        .expect("run harness");
    assert!(output.status.success(), "{output:?}");

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json report");
    let scenarios = report["scenarios"].as_array().expect("scenarios");
    assert_eq!(scenarios.len(), 4);
    for scenario in scenarios {
        assert_eq!(scenario["verdict"], "pass");
        assert_eq!(scenario["counts"]["plain"], 1);
        assert_eq!(scenario["counts"]["namespaced"], 1);
    }
}

#[test]
fn foreign_namespace_document_fails_the_run() {
    let temp = tempfile::tempdir().expect("tempdir");
    let page = temp.path().join("page.xml");
    fs::write(&page, r#"<html xmlns="urn:example:other"><body/></html>"#).expect("write page");

    let output = nsprobectl(temp.path())
        .args(["run", "--content-type", "application/xml", "--context", "secondary-ui"])
        .arg("--document")
        .arg(&page)
        .output()
        .expect("run harness");
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("With Namespace: expected 1 but found 0"), "{stdout}");
    assert!(stdout.contains("1 scenario(s), 0 passed, 1 not passed"), "{stdout}");
}

#[test]
fn config_file_in_working_directory_is_honoured() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(
        temp.path().join("nsprobe.toml"),
        "[document]\ntag_name = \"h1\"\n\n[timeouts]\nprobe_ms = 5000\n",
    )
    .expect("write config");

    let output = nsprobectl(temp.path())
        .args(["run", "--json", "--context", "immediate"])
        .output()
        .expect("run harness");
    assert!(output.status.success(), "{output:?}");
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["scenarios"][0]["context"], "immediate");
}

#[test]
fn unknown_context_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = nsprobectl(temp.path())
        .args(["run", "--context", "worker"])
        .output()
        .expect("run harness");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown execution context `worker`"), "{stderr}");
}
