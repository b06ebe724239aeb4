//! End-to-end tests for the `timereport` binary.
//!
//! Runs the built binary against stdin, literal input and config files, with
//! `HOME` pointed at a temp directory so no user configuration leaks in.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn timereport_binary() -> String {
    env!("CARGO_BIN_EXE_timereport").to_string()
}

/// Command with an isolated home and no `TIMEREPORT_*` overrides.
fn timereport(home: &Path) -> Command {
    let mut cmd = Command::new(timereport_binary());
    cmd.env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("RUST_LOG")
        .env_remove("TIMEREPORT_PAUSE_POLICY")
        .env_remove("TIMEREPORT_SUMMARY")
        .env_remove("TIMEREPORT_ECHO");
    cmd
}

/// Runs the command with `input` on stdin.
fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn timereport");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "timereport should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

const TWO_DAYS: &str = "2019-04-09 8:00-17:00 (50 min lunch) jobbade med data\n\
                        2019-04-09 9:15-16:30 (75 min lunch) mer data\n";

/// Lines on stdin are echoed and summed.
#[test]
fn test_report_from_stdin() {
    let temp = TempDir::new().unwrap();
    let output = run_with_stdin(timereport(temp.path()), TWO_DAYS);

    assert_eq!(
        stdout(&output),
        "2019-04-09 8:00-17:00 (50 min lunch) jobbade med data (490 min)\n\
         2019-04-09 9:15-16:30 (75 min lunch) mer data (360 min)\n\
         Total 2 days, 850 min, 425 mins/day, 14:10\n"
    );
}

/// A literal argument is read instead of stdin.
#[test]
fn test_report_from_argument() {
    let temp = TempDir::new().unwrap();
    let output = timereport(temp.path())
        .arg("2019-04-09 8:00-17:00 jobbade\n2019-04-10 8:00-12:00")
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(
        stdout(&output),
        "2019-04-09 8:00-17:00 jobbade (540 min)\n\
         2019-04-10 8:00-12:00 (240 min)\n\
         Total 2 days, 780 min, 390 mins/day, 13:00\n"
    );
}

/// Unreadable lines are flagged but do not fail the run.
#[test]
fn test_unparsed_lines_keep_exit_code_zero() {
    let temp = TempDir::new().unwrap();
    let output = run_with_stdin(
        timereport(temp.path()),
        "2019/04/09 8.00-17.00 jobbade med data\n\n2019-04-09 8:00-17:00, oops\n",
    );

    assert_eq!(
        stdout(&output),
        "* 2019/04/09 8.00-17.00 jobbade med data\n\
         * 2019-04-09 8:00-17:00, oops\n\
         Total 0 days, 0 min, 0 mins/day, 0:00\n"
    );
}

/// Empty input still produces a zero-day summary.
#[test]
fn test_empty_input() {
    let temp = TempDir::new().unwrap();
    let output = run_with_stdin(timereport(temp.path()), "");
    assert_eq!(stdout(&output), "Total 0 days, 0 min, 0 mins/day, 0:00\n");
}

#[test]
fn test_simple_and_quiet_flags() {
    let temp = TempDir::new().unwrap();
    let mut cmd = timereport(temp.path());
    cmd.args(["--simple", "--quiet"]);
    let output = run_with_stdin(cmd, TWO_DAYS);
    assert_eq!(stdout(&output), "Total 850 min, 14:10\n");
}

#[test]
fn test_json_output() {
    let temp = TempDir::new().unwrap();
    let mut cmd = timereport(temp.path());
    cmd.arg("--json");
    let output = run_with_stdin(cmd, TWO_DAYS);

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["days"], 2);
    assert_eq!(value["total_minutes"], 850);
    assert_eq!(value["minutes_per_day"], 425);
    assert_eq!(value["duration"], "14:10");
    assert_eq!(value["period"]["start"], "2019-04-09");
}

#[test]
fn test_sum_pauses_flag() {
    let temp = TempDir::new().unwrap();
    let input = "2019-04-09 8:00-17:00 (50 min lunch + 10 min call) jobbade med data\n";

    let default = stdout(&run_with_stdin(timereport(temp.path()), input));
    assert!(default.contains("(490 min)"), "got: {default}");

    let mut cmd = timereport(temp.path());
    cmd.arg("--sum-pauses");
    let summed = stdout(&run_with_stdin(cmd, input));
    assert!(summed.contains("(480 min)"), "got: {summed}");
}

/// Settings in an explicit config file apply.
#[test]
fn test_config_file() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("timereport.toml");
    std::fs::write(
        &config_path,
        "pause_policy = \"sum\"\nsummary = \"simple\"\necho = false\n",
    )
    .unwrap();

    let mut cmd = timereport(temp.path());
    cmd.arg("--config").arg(&config_path);
    let output = run_with_stdin(
        cmd,
        "2019-04-09 8:00-17:00 (50 min lunch + 10 min call) jobbade\n",
    );
    assert_eq!(stdout(&output), "Total 480 min, 8:00\n");
}

/// The default config location under the home directory is picked up.
#[test]
fn test_default_config_location() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join(".config/timereport");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "summary = \"simple\"\n").unwrap();

    let output = run_with_stdin(timereport(temp.path()), "2019-04-09 8:00-9:00\n");
    assert_eq!(
        stdout(&output),
        "2019-04-09 8:00-9:00 (60 min)\nTotal 60 min, 1:00\n"
    );
}

/// Environment variables override config files.
#[test]
fn test_env_override() {
    let temp = TempDir::new().unwrap();
    let mut cmd = timereport(temp.path());
    cmd.env("TIMEREPORT_ECHO", "false");
    let output = run_with_stdin(cmd, TWO_DAYS);
    assert_eq!(stdout(&output), "Total 2 days, 850 min, 425 mins/day, 14:10\n");
}

#[test]
fn test_missing_config_file_fails() {
    let temp = TempDir::new().unwrap();
    let output = timereport(temp.path())
        .arg("--config")
        .arg(temp.path().join("absent.toml"))
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to load configuration"),
        "got: {stderr}"
    );
}

/// Verbose logging goes to stderr and leaves stdout untouched.
#[test]
fn test_verbose_logs_to_stderr() {
    let temp = TempDir::new().unwrap();
    let mut cmd = timereport(temp.path());
    cmd.arg("--verbose");
    let output = run_with_stdin(cmd, "not a log line\n");

    assert_eq!(
        stdout(&output),
        "* not a log line\nTotal 0 days, 0 min, 0 mins/day, 0:00\n"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("skipping unparsed line"), "got: {stderr}");
}
