//! End-to-end behaviour of the native runner against real processes
//!
//! These tests spawn `sh`, `echo`, `sleep` and `false`, so they only run on Unix.

#![cfg(unix)]

use std::fs;
use std::time::{Duration, Instant};

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use pgmrun::{
    CommandInvocation, CommandSpec, CommandStatus, FailureCause, NativeRunner, ProcessRunner,
    RunnerOptions,
};
use tempfile::TempDir;

fn fast_runner() -> NativeRunner {
    NativeRunner::with_options(RunnerOptions {
        kill_grace: Duration::from_millis(200),
        drain_timeout: Duration::from_millis(200),
    })
}

fn sh(script: &str) -> CommandSpec {
    CommandSpec::new("sh").arg("-c").arg(script)
}

/// Signal 0 also succeeds for zombies, which `/proc` marks with state `Z`.
fn is_alive(pid: i32) -> bool {
    if kill(Pid::from_raw(pid), None).is_err() {
        return false;
    }
    match fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => !stat
            .rsplit(')')
            .next()
            .is_some_and(|rest| rest.trim_start().starts_with('Z')),
        Err(_) => true,
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_scenario_a_echo_succeeds_with_output() {
    let invocation = CommandInvocation::from_command_line("echo hello", 0);

    let outcome = NativeRunner::new().run(&invocation);

    assert_eq!(outcome.status, CommandStatus::Success);
    assert_eq!(outcome.exit_code, Some(0));
    assert!(outcome.output_string().contains("hello\n"));
}

#[test]
fn test_scenario_b_sleep_times_out() {
    let invocation = CommandInvocation::from_command_line("sleep 5", 1);
    let started = Instant::now();

    let outcome = fast_runner().run(&invocation);

    assert_eq!(outcome.status, CommandStatus::TimedOut);
    assert_eq!(outcome.exit_code, None);
    assert!(started.elapsed() < Duration::from_secs(4), "took {:?}", started.elapsed());
}

#[test]
fn test_scenario_c_false_completes_with_exit_code() {
    let invocation = CommandInvocation::from_command_line("false", 0);

    let outcome = NativeRunner::new().run(&invocation);

    assert_eq!(outcome.status, CommandStatus::Success);
    assert_eq!(outcome.exit_code, Some(1));
    assert!(outcome.output.is_empty());
    assert!(outcome.exited_abnormally());
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_output_is_exact_and_interleaved_in_order() {
    let invocation = CommandInvocation::new(sh("printf a; printf b >&2; printf c; printf 'd\\n' >&2"));

    let outcome = NativeRunner::new().run(&invocation);

    assert_eq!(outcome.status, CommandStatus::Success);
    assert_eq!(outcome.output, b"abcd\n");
}

#[test]
fn test_unresolvable_program_fails_without_output() {
    let invocation = CommandInvocation::from_command_line("pgmrun-no-such-tool --help", 5);

    let outcome = NativeRunner::new().run(&invocation);

    assert!(matches!(outcome.status, CommandStatus::Failed(FailureCause::Spawn { .. })));
    assert!(outcome.output.is_empty());
    assert_eq!(outcome.exit_code, None);
}

#[test]
fn test_non_positive_budget_never_terminates_early() {
    for secs in [0, -3] {
        let invocation = CommandInvocation::from_command_line("sleep 1", secs);
        assert_eq!(invocation.timeout, None);

        let outcome = fast_runner().run(&invocation);

        assert_eq!(outcome.status, CommandStatus::Success, "budget {secs}");
        assert!(outcome.duration >= Duration::from_secs(1));
    }
}

#[test]
fn test_identical_runs_give_identical_outcomes() {
    let invocation = CommandInvocation::new(sh("echo one; echo two >&2; exit 3"));
    let runner = NativeRunner::new();

    let first = runner.run(&invocation);
    let second = runner.run(&invocation);

    assert_eq!(first.status, second.status);
    assert_eq!(first.output, second.output);
    assert_eq!(first.exit_code, Some(3));
    assert_eq!(first.exit_code, second.exit_code);
}

#[test]
fn test_timeout_keeps_output_written_before_the_deadline() {
    let invocation =
        CommandInvocation::new(sh("echo started; sleep 10")).with_timeout(Some(Duration::from_millis(500)));

    let outcome = fast_runner().run(&invocation);

    assert_eq!(outcome.status, CommandStatus::TimedOut);
    assert_eq!(outcome.output_string(), "started\n");
}

#[test]
fn test_timeout_kills_the_whole_process_group() {
    let temp = TempDir::new().unwrap();
    let pid_file = temp.path().join("child.pid");
    // The grandchild ignores SIGTERM, so only the group SIGKILL stops it.
    let script = format!(
        "sh -c 'trap \"\" TERM; sleep 30' & echo $! > {}; wait",
        pid_file.display()
    );
    let invocation = CommandInvocation::new(sh(&script)).with_timeout(Some(Duration::from_millis(500)));

    let outcome = fast_runner().run(&invocation);

    assert_eq!(outcome.status, CommandStatus::TimedOut);
    let pid: i32 = fs::read_to_string(&pid_file).unwrap().trim().parse().unwrap();
    let deadline = Instant::now() + Duration::from_secs(2);
    while is_alive(pid) && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }
    assert!(!is_alive(pid), "process {pid} outlived the timeout");
}

#[cfg(target_os = "linux")]
#[test]
fn test_detached_descendant_does_not_hold_the_run_open() {
    let temp = TempDir::new().unwrap();
    let pid_file = temp.path().join("detached.pid");
    // The detached sleep leaves the process group but keeps the output pipe open.
    let script = format!(
        "setsid sleep 30 & echo $! > {}; echo done",
        pid_file.display()
    );
    let invocation =
        CommandInvocation::new(sh(&script)).with_timeout(Some(Duration::from_secs(1)));
    let started = Instant::now();

    let outcome = fast_runner().run(&invocation);

    let elapsed = started.elapsed();
    let pid: i32 = fs::read_to_string(&pid_file).unwrap().trim().parse().unwrap();
    let _ = kill(Pid::from_raw(pid), Signal::SIGKILL);
    assert_eq!(outcome.status, CommandStatus::Success);
    assert_eq!(outcome.exit_code, Some(0));
    assert_eq!(outcome.output_string(), "done\n");
    assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");
}

#[test]
fn test_arguments_with_spaces_reach_the_tool_unchanged() {
    let invocation = CommandInvocation::new(
        CommandSpec::new("sh")
            .arg("-c")
            .arg("printf '%s|' \"$@\"")
            .arg("sh")
            .args(["my data.train", "$HOME", "a;b"]),
    );

    let outcome = NativeRunner::new().run(&invocation);

    assert_eq!(outcome.output_string(), "my data.train|$HOME|a;b|");
}
