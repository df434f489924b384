use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// A config that finishes in well under a second: two short trials, one
// ground-truth condition, fast frame rate.
fn write_fast_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[task]
channels = 5
size = 0.15
hold_ms = 50
timeout_ms = 200
edge = 0.05

[sweep]
decoders = ["GT"]
styles = ["random"]
dofs = [1]
trials = 2
seed = 7

[pacing]
frame_rate_hz = 200
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["sweep"], 0, "combined", "stdout")]
#[case(&["trial", "--style", "centerout", "--dof", "1"], 0, "1 DOF", "stdout")]
#[case(&["self-check"], 0, "self-check ok", "stdout")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_fast_config(&dir);

    let mut cmd = Command::cargo_bin("reachbench").unwrap();
    // Always include a valid config to avoid relying on the default path
    cmd.arg("--config").arg(&cfg);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn invalid_trial_count_names_the_offending_key() {
    let dir = tempdir().unwrap();
    let toml = r#"
[sweep]
trials = 1
"#;
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, toml).unwrap();

    let mut cmd = Command::cargo_bin("reachbench").unwrap();
    cmd.arg("--config").arg(&cfg).arg("sweep");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("sweep.trials"));
}

#[rstest]
fn missing_decoder_artifact_fails_with_its_own_exit_code() {
    let dir = tempdir().unwrap();
    let cfg = write_fast_config(&dir);
    // Empty artifact directory: any named decoder fails to load.
    let bank = dir.path().join("decoders");
    fs::create_dir(&bank).unwrap();
    let toml = fs::read_to_string(&cfg).unwrap()
        + &format!("\n[decoders]\ndir = \"{}\"\n", bank.display());
    fs::write(&cfg, toml).unwrap();

    let mut cmd = Command::cargo_bin("reachbench").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("sweep")
        .arg("--decoder")
        .arg("handrnn");

    cmd.assert()
        .code(3)
        .stderr(predicate::str::contains("handrnn"));
}

#[rstest]
fn json_mode_emits_a_parseable_results_table() {
    let dir = tempdir().unwrap();
    let cfg = write_fast_config(&dir);

    let mut cmd = Command::cargo_bin("reachbench").unwrap();
    let output = cmd
        .arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("sweep")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let v: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let tables = v["tables"].as_array().unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0]["rows"][0]["decoder"], "GT");
    assert!(tables[0]["rows"][0]["combined_ms"].is_number());
}

#[rstest]
fn recording_writes_one_json_object_per_tick() {
    let dir = tempdir().unwrap();
    let cfg = write_fast_config(&dir);
    let samples = dir.path().join("samples.jsonl");
    let toml = fs::read_to_string(&cfg).unwrap()
        + &format!(
            "\n[recording]\nenabled = true\nfile = \"{}\"\n",
            samples.display()
        );
    fs::write(&cfg, toml).unwrap();

    let mut cmd = Command::cargo_bin("reachbench").unwrap();
    cmd.arg("--config").arg(&cfg).arg("sweep");
    cmd.assert().success();

    let contents = fs::read_to_string(&samples).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert!(!lines.is_empty(), "no samples recorded");
    for line in lines {
        let v: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(v["t_ms"].is_u64());
        assert!(v["trial"].is_u64());
        assert_eq!(v["position"].as_array().unwrap().len(), 5);
        assert_eq!(v["target"].as_array().unwrap().len(), 5);
        assert!(v["online"].is_boolean());
    }
}

#[rstest]
fn self_check_loads_configured_artifacts() {
    let dir = tempdir().unwrap();
    let bank = dir.path().join("decoders");
    fs::create_dir(&bank).unwrap();
    fs::write(bank.join("handrnn.json"), r#"{"integration_beta": 0.2}"#).unwrap();

    let toml = format!(
        r#"
[sweep]
decoders = ["GT", "handrnn"]
trials = 2

[decoders]
dir = "{}"
"#,
        bank.display()
    );
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, toml).unwrap();

    let mut cmd = Command::cargo_bin("reachbench").unwrap();
    cmd.arg("--config").arg(&cfg).arg("self-check");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1 decoder artifacts loadable"));
}

#[rstest]
fn explicitly_missing_config_path_is_an_error() {
    let mut cmd = Command::cargo_bin("reachbench").unwrap();
    cmd.arg("--config").arg("/nonexistent/cfg.toml").arg("self-check");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
