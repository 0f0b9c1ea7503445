use std::io::Write;

use allcode_core::config::{RobotConfig, TransportMode, TRANSPORT_ENV_VAR};
use allcode_core::protocol::PortSpec;
use allcode_core::RobotError;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_env_var_name() {
    assert_eq!(TRANSPORT_ENV_VAR, "ALLCODE_TRANSPORT");
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"{
            "transport": "simulated",
            "port": "/dev/rfcomm1",
            "autoconnect": false,
            "verbose": 1,
            "serial": { "baud_rate": 9600, "read_timeout_ms": 500, "write_timeout_ms": 200 },
            "discovery": { "keywords": ["allcode"], "max_candidates": 2, "read_timeout_ms": 300 },
            "mm_per_sec": 80,
            "deg_per_sec": 30,
            "simulator_seed": 17
        }"#,
    );
    let config = RobotConfig::load(file.path()).unwrap();
    assert_eq!(config.transport, TransportMode::Simulated);
    assert_eq!(config.port, Some(PortSpec::Name("/dev/rfcomm1".to_string())));
    assert!(!config.autoconnect);
    assert_eq!(config.verbose, 1);
    assert_eq!(config.serial.baud_rate, 9600);
    assert_eq!(config.serial.write_timeout_ms, 200);
    assert_eq!(config.discovery.keywords, Some(vec!["allcode".to_string()]));
    assert_eq!(config.discovery.max_candidates, Some(2));
    assert_eq!(config.discovery.read_timeout_ms, 300);
    assert_eq!(config.discovery.write_timeout_ms, 250);
    assert_eq!(config.mm_per_sec(), 80);
    assert_eq!(config.deg_per_sec(), 30);
    assert_eq!(config.simulator_seed, Some(17));
}

#[test]
fn test_load_empty_object_gives_defaults() {
    let file = write_config("{}");
    let config = RobotConfig::load(file.path()).unwrap();
    let expected = RobotConfig::default().with_env_override();
    assert_eq!(config, expected);
}

#[test]
fn test_load_rejects_bad_files() {
    let file = write_config("{ not json");
    assert!(matches!(RobotConfig::load(file.path()), Err(RobotError::Json(_))));

    let file = write_config(r#"{"serial": {"baud_rate": 0}}"#);
    assert!(matches!(RobotConfig::load(file.path()), Err(RobotError::Config(_))));

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        RobotConfig::load(dir.path().join("missing.json")),
        Err(RobotError::Io(_))
    ));
}

#[test]
fn test_config_round_trips_through_json() {
    let config = RobotConfig::simulated().with_port(3u32).with_verbose(2).with_seed(9);
    let json = serde_json::to_string(&config).unwrap();
    let back: RobotConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
