//! Smoke tests for the pgmrun binary
//!
//! A shell script named `libra` stands in for the real tool: it echoes its
//! arguments, creates the files named by `-o` and `-log`, and answers
//! `acquery` with fixed log-probabilities. Each test runs in its own temp dir
//! with a `.git` marker so no outer `.pgmrun/config.toml` is picked up.

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn pgmrun_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pgmrun"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join(".git")).unwrap();
    temp
}

const PAIR_BIF: &str = "network pair { }
variable a { type discrete [ 2 ] { t, f }; }
variable b { type discrete [ 2 ] { t, f }; }
probability ( a ) { table 0.5, 0.5; }
probability ( b | a ) { (t) 0.5, 0.5; (f) 0.5, 0.5; }
";

#[cfg(unix)]
fn fake_libra(dir: &Path, learn_delay_secs: u32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let bin = dir.join("bin");
    fs::create_dir_all(&bin).unwrap();
    let path = bin.join("libra");
    let script = format!(
        r#"#!/bin/sh
echo "fake libra $*"
if [ "$1" = "acquery" ]; then
  echo "-0.6931471805599453"
  exit 0
fi
if [ "$1" = "cl" ] && [ {learn_delay_secs} -gt 0 ]; then
  sleep {learn_delay_secs}
fi
while [ $# -gt 0 ]; do
  case "$1" in
    -o|-log) : > "$2"; shift ;;
  esac
  shift
done
exit 0
"#
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

// ============================================================================
// Usage and configuration errors
// ============================================================================

#[test]
fn version_output() {
    let temp = workspace();
    pgmrun_cmd(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pgmrun"));
}

#[test]
fn missing_required_flag_exits_with_usage_code() {
    let temp = workspace();
    pgmrun_cmd(temp.path())
        .args(["learn", "-i", "in", "-o", "out"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--executable"));
}

#[test]
fn unsupported_executable_exits_with_code_3() {
    let temp = workspace();
    pgmrun_cmd(temp.path())
        .args(["learn", "-i", "in", "-o", "out", "-e", "/opt/weka/weka.jar"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unsupported algorithm"));
}

#[test]
fn libra_without_sub_mode_exits_with_code_2() {
    let temp = workspace();
    pgmrun_cmd(temp.path())
        .args(["infer", "-i", "in", "-o", "out", "-e", "libra"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Missing required input"));
}

#[test]
fn malformed_config_exits_with_code_2() {
    let temp = workspace();
    let config_dir = temp.path().join(".pgmrun");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[defaults]\nunknown_key = 1\n").unwrap();

    pgmrun_cmd(temp.path())
        .args(["split", "data.csv"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("config"));
}

// ============================================================================
// Commands without external tools
// ============================================================================

#[test]
fn split_is_reproducible_with_seed() {
    let temp = workspace();
    let body: String = (0..20).map(|i| format!("{i},{}\n", i % 3)).collect();
    fs::write(temp.path().join("rows.csv"), format!("x,y\n{body}")).unwrap();

    let run = || {
        pgmrun_cmd(temp.path())
            .args(["--seed", "17", "split", "rows.csv", "0.25"])
            .assert()
            .success()
            .stdout(predicate::str::contains("5 test rows"));
        fs::read_to_string(temp.path().join("rows_test.csv")).unwrap()
    };

    assert_eq!(run(), run());
}

#[test]
fn split_rejects_out_of_range_test_size() {
    let temp = workspace();
    fs::write(temp.path().join("rows.csv"), "x\n1\n").unwrap();

    pgmrun_cmd(temp.path())
        .args(["split", "rows.csv", "0"])
        .assert()
        .code(2);
}

#[test]
fn pair_network_hides_its_root() {
    let network = pgmrun::BifNetwork::parse(PAIR_BIF).unwrap();
    let internals: Vec<&str> = network.internals().iter().map(|v| v.name.as_str()).collect();

    assert_eq!(internals, ["a"]);
}

#[test]
fn hide_writes_cut_files() {
    let temp = workspace();
    let input = temp.path().join("bench");
    fs::create_dir_all(input.join("data")).unwrap();
    fs::write(input.join("pair.bif"), PAIR_BIF).unwrap();
    fs::write(input.join("data/pair.train"), "0,1\n1,1\n").unwrap();

    pgmrun_cmd(temp.path())
        .args(["--seed", "1", "hide", "-i", "bench", "-o", "hidden", "-n", "1", "--instances", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hide: 1 succeeded"));

    for k in 1..=2 {
        let cut = fs::read_to_string(temp.path().join(format!("hidden/data/pair-X1I{k}.train"))).unwrap();
        assert_eq!(cut, "1\n1\n");
    }
}

// ============================================================================
// Pipelines through a fake libra
// ============================================================================

#[cfg(unix)]
#[test]
fn sample_learn_infer_score_pipeline() {
    let temp = workspace();
    let libra = fake_libra(temp.path(), 0);
    let libra = libra.to_str().unwrap();
    let bench = temp.path().join("bench");
    fs::create_dir_all(bench.join("query")).unwrap();
    fs::write(bench.join("pair.bif"), PAIR_BIF).unwrap();

    pgmrun_cmd(temp.path())
        .args(["--seed", "5", "sample", "-i", "bench", "--tr", "10", "--te", "5", "--va", "5", "-e", libra])
        .assert()
        .success()
        .stdout(predicate::str::contains("sample: 1 succeeded"));
    assert_eq!(fs::read_to_string(bench.join("data/pair.schema")).unwrap(), "2,2\n");
    assert!(bench.join("data/pair.train").is_file());
    assert!(bench.join("model/pair.score").is_file());

    pgmrun_cmd(temp.path())
        .args(["--seed", "5", "learn", "-i", "bench", "-o", "models", "-e", libra, "-s", "cl", "-t", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("learn: 1 succeeded, 0 failed"));
    let models = temp.path().join("models");
    assert!(models.join("pair-cl.bn").is_file());
    assert!(models.join("pair-cl.out").is_file());
    assert!(models.join("pair-cl.score").is_file());

    fs::write(bench.join("query/pair.q"), "0,*\n").unwrap();
    pgmrun_cmd(temp.path())
        .args(["infer", "-i", "bench", "-o", "models", "-e", libra, "-s", "cl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("infer: 1 succeeded"));
    let exact = fs::read_to_string(models.join("pair-cl.exact")).unwrap();
    assert_eq!(exact, "-0.6931471805599453\n");

    fs::write(bench.join("query/pair.infkey"), "fake libra\n-0.6931471805599453\n").unwrap();
    pgmrun_cmd(temp.path())
        .args(["score", "-i", "bench", "-o", "models", "-e", libra])
        .assert()
        .success()
        .stdout(predicate::str::contains("score: 1 succeeded"));
    let ase = fs::read_to_string(models.join("pair-cl.exact.ase")).unwrap();
    assert_eq!(ase.trim().parse::<f64>().unwrap(), 0.0);
}

#[cfg(unix)]
#[test]
fn learner_timeout_is_recorded_and_batch_finishes() {
    let temp = workspace();
    let libra = fake_libra(temp.path(), 10);
    let data = temp.path().join("bench/data");
    fs::create_dir_all(&data).unwrap();
    for ext in ["train", "test", "schema"] {
        fs::write(data.join(format!("pair.{ext}")), "0,1\n").unwrap();
    }

    pgmrun_cmd(temp.path())
        .args(["--kill-grace-ms", "100", "learn", "-i", "bench", "-o", "models", "-s", "cl", "-t", "1", "-e"])
        .arg(&libra)
        .assert()
        .success()
        .stdout(predicate::str::contains("learn: 0 succeeded, 1 failed"))
        .stdout(predicate::str::contains("timed out"));
    assert!(!temp.path().join("models/pair-cl.score").exists());
}
