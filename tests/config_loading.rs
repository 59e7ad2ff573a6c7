// tests/config_loading.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::io::Write;
use std::time::Duration;

use clap::Parser;
use tempfile::NamedTempFile;

use ecsrun::cli::{CliArgs, split_command_lines};
use ecsrun::config::{Invocation, InvocationInput, load_and_validate, parse_duration};
use ecsrun::engine::wait::MAX_WAIT_LIMIT;
use ecsrun::errors::EcsrunError;
use ecsrun::model::LaunchType;
use ecsrun::types::{MissingServicePolicy, NetworkPolicy};

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

const FULL_CONFIG: &str = r#"
[invocation]
cluster = "prod"
service = "web"
slot_label = "migrate"
wait_for_finish = true
override_container = "app"
override_command = ["bin/rails", "db:migrate"]
launch_type = "EC2"

[wait]
max_wait = "30m"
poll_interval = "10s"

[policy]
missing_service = "skip"
network = "required"
stop_reason = "superseded"

[console]
region = "eu-west-1"
"#;

#[test]
fn full_config_file_builds_an_invocation() -> TestResult {
    init_tracing();

    let file = write_config(FULL_CONFIG)?;
    let cfg = load_and_validate(file.path())?;
    let invocation = Invocation::try_from(cfg.to_input())?;

    assert_eq!(invocation.cluster, "prod");
    assert_eq!(invocation.slot.as_str(), "migrate:web");
    assert!(invocation.wait_for_finish);
    assert!(!invocation.stop_existing);
    assert_eq!(invocation.overrides.container(), Some("app"));
    assert_eq!(invocation.wait.max_wait, Duration::from_secs(30 * 60));
    assert_eq!(invocation.wait.poll_interval, Duration::from_secs(10));
    assert_eq!(invocation.fetch.missing_service, MissingServicePolicy::Skip);
    assert_eq!(invocation.fetch.network, NetworkPolicy::Required);
    assert_eq!(invocation.fetch.fallback_launch_type, Some(LaunchType::Ec2));
    assert_eq!(invocation.stop_reason, "superseded");
    assert_eq!(invocation.region.as_deref(), Some("eu-west-1"));
    Ok(())
}

#[test]
fn command_line_values_win_over_file_values() -> TestResult {
    let file = write_config(FULL_CONFIG)?;
    let cfg = load_and_validate(file.path())?;

    let args = CliArgs::try_parse_from([
        "ecsrun",
        "--service",
        "worker",
        "--wait-for-finish",
        "false",
        "--max-wait",
        "5m",
    ])?;
    let invocation = Invocation::try_from(args.to_input().or(cfg.to_input()))?;

    assert_eq!(invocation.cluster, "prod");
    assert_eq!(invocation.service, "worker");
    assert_eq!(invocation.slot.as_str(), "migrate:worker");
    assert!(!invocation.wait_for_finish);
    assert_eq!(invocation.wait.max_wait, Duration::from_secs(5 * 60));
    assert_eq!(invocation.wait.poll_interval, Duration::from_secs(10));
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() -> TestResult {
    let file = write_config("[invocation]\nclustr = \"prod\"\n")?;

    let result = load_and_validate(file.path());

    assert!(matches!(result, Err(EcsrunError::Toml(_))));
    Ok(())
}

#[test]
fn invalid_wait_durations_are_config_errors() -> TestResult {
    let bad_unit = write_config("[wait]\nmax_wait = \"10 fortnights\"\n")?;
    assert!(matches!(
        load_and_validate(bad_unit.path()),
        Err(EcsrunError::Config(_))
    ));

    let poll_too_long = write_config("[wait]\nmax_wait = \"1m\"\npoll_interval = \"2m\"\n")?;
    assert!(matches!(
        load_and_validate(poll_too_long.path()),
        Err(EcsrunError::Config(_))
    ));
    Ok(())
}

#[test]
fn reserved_label_in_file_is_a_config_error() -> TestResult {
    let file = write_config("[invocation]\nslot_label = \"service\"\n")?;

    match load_and_validate(file.path()) {
        Err(EcsrunError::Config(msg)) => assert!(msg.contains("service")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
    Ok(())
}

#[test]
fn console_template_needs_task_placeholder() -> TestResult {
    let file = write_config("[console]\nurl_template = \"https://example.com/{cluster}\"\n")?;

    assert!(matches!(
        load_and_validate(file.path()),
        Err(EcsrunError::Config(_))
    ));
    Ok(())
}

#[test]
fn missing_config_file_is_an_io_error() {
    let result = load_and_validate("/definitely/not/here/ecsrun.toml");
    assert!(matches!(result, Err(EcsrunError::Io(_))));
}

#[test]
fn cluster_and_service_are_required() {
    let missing_cluster = InvocationInput {
        service: Some("web".to_string()),
        ..InvocationInput::default()
    };
    match Invocation::try_from(missing_cluster) {
        Err(EcsrunError::Validation(msg)) => assert!(msg.contains("cluster")),
        other => panic!("Expected Validation error, got: {:?}", other),
    }

    let blank_service = InvocationInput {
        cluster: Some("prod".to_string()),
        service: Some("   ".to_string()),
        ..InvocationInput::default()
    };
    assert!(matches!(
        Invocation::try_from(blank_service),
        Err(EcsrunError::Validation(_))
    ));
}

#[test]
fn lone_override_container_fails_validation() {
    let input = InvocationInput {
        cluster: Some("prod".to_string()),
        service: Some("web".to_string()),
        override_container: Some("app".to_string()),
        ..InvocationInput::default()
    };

    assert!(matches!(
        Invocation::try_from(input),
        Err(EcsrunError::Validation(_))
    ));
}

#[test]
fn poll_interval_defaults_within_short_max_wait() -> TestResult {
    let input = InvocationInput {
        cluster: Some("prod".to_string()),
        service: Some("web".to_string()),
        max_wait: Some("3s".to_string()),
        ..InvocationInput::default()
    };

    let invocation = Invocation::try_from(input)?;

    assert_eq!(invocation.wait.max_wait, Duration::from_secs(3));
    assert_eq!(invocation.wait.poll_interval, Duration::from_secs(3));
    Ok(())
}

#[test]
fn zero_max_wait_is_rejected() {
    let input = InvocationInput {
        cluster: Some("prod".to_string()),
        service: Some("web".to_string()),
        max_wait: Some("0s".to_string()),
        ..InvocationInput::default()
    };

    assert!(matches!(
        Invocation::try_from(input),
        Err(EcsrunError::Validation(_))
    ));
}

#[test]
fn parse_duration_accepts_units_and_compounds() {
    assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
    assert_eq!(parse_duration("6s"), Ok(Duration::from_secs(6)));
    assert_eq!(parse_duration("10m"), Ok(Duration::from_secs(600)));
    assert_eq!(parse_duration("2h"), Ok(Duration::from_secs(7200)));
    assert_eq!(parse_duration("1m30s"), Ok(Duration::from_secs(90)));
    assert_eq!(parse_duration(" 100m "), Ok(Duration::from_secs(6000)));

    assert!(parse_duration("").is_err());
    assert!(parse_duration("42").is_err());
    assert!(parse_duration("5d").is_err());
}

#[test]
fn multi_line_command_is_split_per_line() {
    let values = vec!["bin/rails\n  db:migrate \n\n".to_string(), "--trace".to_string()];

    assert_eq!(
        split_command_lines(&values),
        vec!["bin/rails", "db:migrate", "--trace"]
    );
}

#[test]
fn boolean_flags_accept_bare_and_explicit_values() -> TestResult {
    let bare = CliArgs::try_parse_from(["ecsrun", "--wait-for-finish", "--stop-existing"])?;
    assert_eq!(bare.wait_for_finish, Some(true));
    assert_eq!(bare.stop_existing, Some(true));

    let explicit = CliArgs::try_parse_from(["ecsrun", "--wait-for-finish", "false"])?;
    assert_eq!(explicit.wait_for_finish, Some(false));
    assert_eq!(explicit.stop_existing, None);
    Ok(())
}

#[test]
fn group_suffix_is_an_alias_for_slot_label() -> TestResult {
    let args = CliArgs::try_parse_from([
        "ecsrun",
        "--cluster",
        "prod",
        "--service",
        "web",
        "--group-suffix",
        "nightly",
        "--launch-type",
        "FARGATE",
        "--missing-service",
        "skip",
    ])?;

    assert_eq!(args.slot_label.as_deref(), Some("nightly"));
    assert_eq!(args.launch_type, Some(LaunchType::Fargate));

    let invocation = Invocation::try_from(args.to_input())?;
    assert_eq!(invocation.slot.as_str(), "nightly:web");
    assert_eq!(invocation.fetch.missing_service, MissingServicePolicy::Skip);
    Ok(())
}

#[test]
fn parse_duration_rejects_out_of_range_values() {
    // Unit multiplication overflow.
    assert!(parse_duration("999999999999999999m").is_err());
    assert!(parse_duration("9999999999999999h").is_err());
    // Overflow while summing compound parts.
    assert!(parse_duration("18446744073709551615s1s").is_err());
}

#[test]
fn max_wait_beyond_limit_is_rejected() -> TestResult {
    let input = |max_wait: &str| InvocationInput {
        cluster: Some("prod".to_string()),
        service: Some("web".to_string()),
        max_wait: Some(max_wait.to_string()),
        ..InvocationInput::default()
    };

    for too_long in ["18446744073709551615s", "169h"] {
        match Invocation::try_from(input(too_long)) {
            Err(EcsrunError::Validation(msg)) => assert!(msg.contains("max-wait")),
            other => panic!("Expected Validation error for {too_long}, got: {:?}", other),
        }
    }

    let invocation = Invocation::try_from(input("168h"))?;
    assert_eq!(invocation.wait.max_wait, MAX_WAIT_LIMIT);
    Ok(())
}
