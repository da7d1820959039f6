// tests/cli_end_to_end.rs

mod common;

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use assert_cmd::Command;
use common::{log_files, only_log};
use logrun::exec::signal_name;
use logrun::transcript::BAR;
use predicates::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// `logrun -d <dir>` with an isolated environment.
fn logrun(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("logrun").expect("logrun binary");
    cmd.env("HOME", dir)
        .env_remove("LOGRUN_DIR")
        .env_remove("LOGRUN_CONFIG")
        .env_remove("LOGRUN_LOG")
        .current_dir(dir)
        .arg("-d")
        .arg(dir);
    cmd
}

#[test]
fn exit_status_is_propagated() -> TestResult {
    for code in [0, 1, 42, 255] {
        let tmp = tempfile::tempdir()?;
        logrun(tmp.path())
            .args(["exit", &code.to_string()])
            .assert()
            .code(code);
        assert!(only_log(tmp.path()).contains(&format!("EXIT STATUS: {code}\n")));
    }
    Ok(())
}

#[test]
fn stdout_passes_through_and_is_logged() -> TestResult {
    let tmp = tempfile::tempdir()?;
    logrun(tmp.path())
        .args(["printf", "'a\\nb\\n'"])
        .assert()
        .success()
        .stdout("a\nb\n")
        .stderr(predicate::str::contains("(This output saved to file: "));

    let log = only_log(tmp.path());
    assert!(log.contains("SHELL COMMAND: printf 'a\\nb\\n'\n"));
    assert!(log.contains(&format!("{BAR}\na\nb\n\n{BAR}\n")));
    Ok(())
}

#[test]
fn direct_mode_header_and_arguments() -> TestResult {
    let tmp = tempfile::tempdir()?;
    logrun(tmp.path())
        .args(["-x", "printf", "%s", "a b"])
        .assert()
        .success()
        .stdout("a b");

    let log = only_log(tmp.path());
    assert!(log.contains(
        "EXECUTABLE: printf\nCOMMAND LINE: printf %s a b\nCOMMAND LINE (QUOTED): \"printf\" \"%s\" \"a b\"\n"
    ));
    Ok(())
}

#[test]
fn non_utf8_argument_reaches_the_child() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let data = tmp.path().join("data");
    std::fs::create_dir(&data)?;
    let file = data.join(OsStr::from_bytes(b"f\xE9.txt"));
    std::fs::write(&file, "from a latin-1 name\n")?;

    logrun(tmp.path())
        .arg("-x")
        .arg("cat")
        .arg(&file)
        .assert()
        .success()
        .stdout("from a latin-1 name\n");

    assert!(only_log(tmp.path()).contains("from a latin-1 name\n"));
    Ok(())
}

#[test]
fn killed_child_exits_one_with_signal_line() -> TestResult {
    let tmp = tempfile::tempdir()?;
    logrun(tmp.path())
        .args(["-x", "sh", "-c", "kill -KILL $$"])
        .assert()
        .code(1);

    assert!(only_log(tmp.path()).contains(&format!("EXIT SIGNAL: {}\n", signal_name(9))));
    Ok(())
}

#[test]
fn silent_child_still_gets_header_and_footer() -> TestResult {
    let tmp = tempfile::tempdir()?;
    logrun(tmp.path()).arg("true").assert().success().stdout("");

    let log = only_log(tmp.path());
    assert!(log.starts_with(&format!("{BAR}\nTIME: ")));
    assert!(log.ends_with(&format!("EXIT STATUS: 0\n{BAR}\n")));
    Ok(())
}

#[test]
fn repeated_runs_create_distinct_files() -> TestResult {
    let tmp = tempfile::tempdir()?;
    logrun(tmp.path()).args(["echo", "one"]).assert().success();
    logrun(tmp.path()).args(["echo", "two"]).assert().success();

    let files = log_files(tmp.path());
    assert_eq!(files.len(), 2);
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(names[0].ends_with("_01"), "{names:?}");
    assert!(names[1].ends_with("_02"), "{names:?}");
    assert!(std::fs::read_to_string(&files[1])?.contains("two\n"));
    Ok(())
}

#[test]
fn missing_program_in_direct_mode_exits_127() -> TestResult {
    let tmp = tempfile::tempdir()?;
    logrun(tmp.path())
        .args(["-x", "logrun-no-such-program-xyz"])
        .assert()
        .code(127)
        .stderr(predicate::str::contains(
            "execvp(logrun-no-such-program-xyz) failed: ",
        ));

    assert!(only_log(tmp.path()).contains("EXIT STATUS: 127\n"));
    Ok(())
}

#[test]
fn unusable_dir_falls_back_to_logrun_dir() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let fallback = tmp.path().join("fallback");
    std::fs::create_dir(&fallback)?;

    let mut cmd = Command::cargo_bin("logrun")?;
    cmd.env("HOME", tmp.path())
        .env("LOGRUN_DIR", &fallback)
        .env_remove("LOGRUN_CONFIG")
        .current_dir(tmp.path())
        .args(["-d", "/definitely/not/here", "true"])
        .assert()
        .success();

    assert_eq!(log_files(&fallback).len(), 1);
    assert!(log_files(tmp.path()).is_empty());
    Ok(())
}

#[test]
fn settings_file_supplies_output_dir() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let out = tmp.path().join("out");
    std::fs::create_dir(&out)?;
    std::fs::write(
        tmp.path().join(".logrun.toml"),
        format!("[output]\ndir = {:?}\n", out.display().to_string()),
    )?;

    Command::cargo_bin("logrun")?
        .env("HOME", tmp.path())
        .env_remove("LOGRUN_DIR")
        .env_remove("LOGRUN_CONFIG")
        .current_dir(tmp.path())
        .arg("true")
        .assert()
        .success();

    assert_eq!(log_files(&out).len(), 1);
    Ok(())
}

#[test]
fn bad_settings_file_fails_before_running() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = tmp.path().join("bad.toml");
    std::fs::write(&cfg, "[run]\nshell = \"sh\"\n")?;

    logrun(tmp.path())
        .arg("--config")
        .arg(&cfg)
        .arg("true")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));

    assert!(log_files(tmp.path()).is_empty());
    Ok(())
}

#[test]
fn missing_command_is_a_usage_error() -> TestResult {
    let tmp = tempfile::tempdir()?;
    logrun(tmp.path()).assert().code(2);
    Ok(())
}
