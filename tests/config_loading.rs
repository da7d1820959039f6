// tests/config_loading.rs

mod common;

use std::ffi::OsString;
use std::io::Write;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};
use std::time::Duration;

use common::init_tracing;
use logrun::cli;
use logrun::config::{
    ConfigFile, Environment, Settings, default_config_path, load_and_validate, load_optional,
};
use logrun::errors::LogrunError;
use logrun::exec::ReapStrategy;
use logrun::types::{ExecMode, HeartbeatLevel, ReapMode};
use logrun_test_utils::builders::ConfigFileBuilder;
use tempfile::NamedTempFile;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn toml_file(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("temp file");
    f.write_all(contents.as_bytes()).expect("write toml");
    f
}

fn args(argv: &[&str]) -> cli::CliArgs {
    cli::try_parse_from(argv.iter().copied()).expect("valid arguments")
}

#[test]
fn full_settings_file_parses() -> TestResult {
    init_tracing();

    let f = toml_file(
        r#"
[output]
dir = "/var/tmp/logs"

[run]
heartbeat = 2
shell = "/bin/bash"
direct = true
reap = "poll"
reap_retry_ms = 200
"#,
    );
    let cfg = load_and_validate(f.path())?;
    assert_eq!(cfg.output.dir, Some(PathBuf::from("/var/tmp/logs")));
    assert_eq!(cfg.run.heartbeat, 2);
    assert_eq!(cfg.run.shell, PathBuf::from("/bin/bash"));
    assert!(cfg.run.direct);
    assert_eq!(cfg.run.reap, ReapMode::Poll);
    assert_eq!(cfg.run.reap_retry_ms, 200);
    Ok(())
}

#[test]
fn empty_file_means_defaults() -> TestResult {
    let f = toml_file("");
    let cfg = load_and_validate(f.path())?;
    assert_eq!(cfg.output.dir, None);
    assert_eq!(cfg.run.heartbeat, 0);
    assert_eq!(cfg.run.shell, PathBuf::from("/bin/sh"));
    assert!(!cfg.run.direct);
    assert_eq!(cfg.run.reap, ReapMode::Wait);
    assert_eq!(cfg.run.reap_retry_ms, 50);
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() {
    let f = toml_file("[run]\nheartbeet = 2\n");
    let err = load_and_validate(f.path()).expect_err("typo should fail");
    assert!(matches!(err, LogrunError::TomlError(_)));
}

#[test]
fn relative_shell_is_rejected() {
    let f = toml_file("[run]\nshell = \"bash\"\n");
    let err = load_and_validate(f.path()).expect_err("relative shell");
    assert!(matches!(err, LogrunError::ConfigError(msg) if msg.contains("absolute")));
}

#[test]
fn reap_retry_must_be_in_range() {
    for bad in [0, 10_001] {
        let raw = ConfigFileBuilder::new()
            .reap(ReapMode::Poll, bad)
            .build_raw();
        assert!(ConfigFile::try_from(raw).is_err(), "{bad} should be rejected");
    }
    let raw = ConfigFileBuilder::new().reap(ReapMode::Poll, 10_000).build_raw();
    assert!(ConfigFile::try_from(raw).is_ok());
}

#[test]
fn empty_output_dir_is_rejected() {
    let raw = ConfigFileBuilder::new().dir("").build_raw();
    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(LogrunError::ConfigError(_))
    ));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let err = load_optional(Some(Path::new("/no/such/logrun.toml")), &Environment::default())
        .expect_err("missing explicit file");
    assert!(matches!(err, LogrunError::ConfigError(_)));
    assert_eq!(err.exit_status(), 1);
}

#[test]
fn default_location_prefers_env_over_home() {
    let env = Environment {
        logrun_dir: None,
        home: Some(PathBuf::from("/home/u")),
        config_path: None,
    };
    assert_eq!(
        default_config_path(&env),
        Some(PathBuf::from("/home/u/.logrun.toml"))
    );

    let env = Environment {
        config_path: Some(PathBuf::from("/etc/logrun.toml")),
        ..env
    };
    assert_eq!(default_config_path(&env), Some(PathBuf::from("/etc/logrun.toml")));
    assert_eq!(default_config_path(&Environment::default()), None);
}

#[test]
fn absent_default_file_falls_back_to_defaults() -> TestResult {
    let home = tempfile::tempdir()?;
    let env = Environment {
        logrun_dir: None,
        home: Some(home.path().to_path_buf()),
        config_path: None,
    };
    let cfg = load_optional(None, &env)?;
    assert_eq!(cfg.run.heartbeat, 0);
    Ok(())
}

#[test]
fn home_settings_file_is_picked_up() -> TestResult {
    let home = tempfile::tempdir()?;
    std::fs::write(home.path().join(".logrun.toml"), "[run]\nheartbeat = 3\n")?;
    let env = Environment {
        logrun_dir: None,
        home: Some(home.path().to_path_buf()),
        config_path: None,
    };
    let cfg = load_optional(None, &env)?;
    assert_eq!(cfg.run.heartbeat, 3);
    Ok(())
}

#[test]
fn option_parsing_stops_at_the_command() {
    let a = args(&["logrun", "-gg", "-x", "ls", "-l", "-d", "x"]);
    assert_eq!(a.heartbeat, 2);
    assert!(a.direct);
    assert_eq!(a.dir, None);
    assert_eq!(a.command, vec!["ls", "-l", "-d", "x"]);

    let a = args(&["logrun", "-d", "/tmp/out", "make", "all"]);
    assert_eq!(a.dir, Some(PathBuf::from("/tmp/out")));
    assert_eq!(a.command, vec!["make", "all"]);
}

#[test]
fn non_utf8_command_arguments_are_accepted() {
    let raw = OsString::from_vec(b"f\xE9.txt".to_vec());
    let a = cli::try_parse_from([
        OsString::from("logrun"),
        OsString::from("-x"),
        OsString::from("cat"),
        raw.clone(),
    ])
    .expect("non-UTF-8 arguments should parse");

    assert!(a.direct);
    assert_eq!(a.command.len(), 2);
    assert_eq!(a.command[1].as_bytes(), raw.as_bytes());
}

#[test]
fn missing_command_is_a_usage_error() {
    assert!(cli::try_parse_from(["logrun", "-g"]).is_err());
}

#[test]
fn command_line_overrides_settings_file() -> TestResult {
    let file = ConfigFileBuilder::new()
        .dir("/from/file")
        .heartbeat(1)
        .reap(ReapMode::Poll, 75)
        .build();

    let s = Settings::resolve(&args(&["logrun", "-ggg", "-d", "/from/cli", "x"]), &file)?;
    assert_eq!(s.heartbeat, HeartbeatLevel(3));
    assert_eq!(s.dir, Some(PathBuf::from("/from/cli")));
    assert_eq!(s.command.mode, ExecMode::Shell);
    assert_eq!(
        s.reap,
        ReapStrategy::Poll {
            retry_delay: Duration::from_millis(75)
        }
    );

    let s = Settings::resolve(&args(&["logrun", "x"]), &file)?;
    assert_eq!(s.heartbeat, HeartbeatLevel(1));
    assert_eq!(s.dir, Some(PathBuf::from("/from/file")));
    Ok(())
}

#[test]
fn direct_mode_from_flag_or_file() -> TestResult {
    let plain = ConfigFileBuilder::new().build();
    let direct = ConfigFileBuilder::new().direct(true).build();

    let s = Settings::resolve(&args(&["logrun", "ls"]), &plain)?;
    assert_eq!(s.command.mode, ExecMode::Shell);
    assert_eq!(s.reap, ReapStrategy::Wait);

    let s = Settings::resolve(&args(&["logrun", "-x", "ls"]), &plain)?;
    assert_eq!(s.command.mode, ExecMode::Direct);

    let s = Settings::resolve(&args(&["logrun", "ls"]), &direct)?;
    assert_eq!(s.command.mode, ExecMode::Direct);
    Ok(())
}
