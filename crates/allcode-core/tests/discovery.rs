mod common;

use std::time::Duration;

use allcode_core::discovery::{rank_candidates, AutodetectOptions, PortCandidate, DEFAULT_RANK_KEYWORDS};
use common::{MockBus, PortScript};
use pretty_assertions::assert_eq;

const FAST: Duration = Duration::from_millis(10);

fn bluetooth(device: &str) -> PortCandidate {
    PortCandidate::new(
        device,
        format!("Standard Serial over Bluetooth link ({})", device),
        "BTHENUM\\{00001101-0000-1000-8000-00805F9B34FB}_LOCALMFG&0000",
    )
}

fn fast_options() -> AutodetectOptions {
    AutodetectOptions {
        read_timeout_ms: 10,
        write_timeout_ms: 10,
        ..AutodetectOptions::default()
    }
}

#[test]
fn test_bluetooth_ranks_above_usb() {
    let ports = vec![
        PortCandidate::new("COM3", "USB Serial Device", "USB VID:PID=1a86:7523"),
        PortCandidate::new("COM7", "Bluetooth Port", "n/a"),
    ];
    let ranked = rank_candidates(&ports, DEFAULT_RANK_KEYWORDS);
    assert_eq!(ranked, vec!["COM7".to_string(), "COM3".to_string()]);
}

#[test]
fn test_rank_is_deterministic() {
    let bus = MockBus::new();
    let ports = vec![bluetooth("COM8"), bluetooth("COM5"), PortCandidate::new("COM1", "n/a", "n/a")];
    let discovery = common::discovery(&bus, ports.clone());
    let first = discovery.rank();
    for _ in 0..5 {
        assert_eq!(discovery.rank(), first);
    }
    assert_eq!(first, vec!["COM5", "COM8", "COM1"]);

    let mut reversed = ports;
    reversed.reverse();
    assert_eq!(common::discovery(&bus, reversed).rank(), first);
}

#[test]
fn test_custom_keywords() {
    let bus = MockBus::new();
    let discovery = common::discovery(
        &bus,
        vec![
            PortCandidate::new("/dev/ttyUSB0", "CP2102 USB to UART", "n/a"),
            PortCandidate::new("/dev/ttyACM0", "AllCode Robot", "n/a"),
        ],
    );
    assert_eq!(discovery.rank_with(&["allcode"]), vec!["/dev/ttyACM0", "/dev/ttyUSB0"]);
    let likely = discovery.find_likely_with(&["cp210"]);
    assert_eq!(likely.len(), 1);
    assert_eq!(likely[0].device, "/dev/ttyUSB0");
}

#[test]
fn test_find_likely_defaults() {
    let bus = MockBus::new();
    let discovery = common::discovery(
        &bus,
        vec![
            PortCandidate::new("COM1", "Communications Port", "ACPI"),
            PortCandidate::new("COM4", "Arduino Uno", "USB VID:PID=2341:0043"),
            bluetooth("COM7"),
        ],
    );
    let devices: Vec<String> = discovery.find_likely().into_iter().map(|c| c.device).collect();
    assert_eq!(devices, vec!["COM4", "COM7"]);
}

#[test]
fn test_probe_accepts_api_version() {
    common::init_tracing();
    let bus = MockBus::new();
    bus.script("COM7", PortScript::replies(&["7\n"]));
    let discovery = common::discovery(&bus, vec![]);
    assert!(discovery.probe("COM7", FAST, FAST));
    assert_eq!(bus.writes(), vec!["GetAPIVersion\n".to_string()]);
    assert_eq!(bus.closed(), 1);
}

#[test]
fn test_probe_drains_stale_input_first() {
    let bus = MockBus::new();
    bus.script(
        "COM7",
        PortScript {
            stale: vec!["garbage\n", "99999\n"],
            replies: vec!["3\n"],
            ..PortScript::default()
        },
    );
    assert!(common::discovery(&bus, vec![]).probe("COM7", FAST, FAST));
}

#[test]
fn test_probe_failures() {
    let bus = MockBus::new();
    bus.script("empty", PortScript::default());
    bus.script("text", PortScript::replies(&["hello\n"]));
    bus.script("huge", PortScript::replies(&["10000\n"]));
    bus.script("negative", PortScript::replies(&["-1\n"]));
    bus.script(
        "nowrite",
        PortScript {
            fail_write: true,
            ..PortScript::default()
        },
    );
    bus.script(
        "noopen",
        PortScript {
            fail_open: true,
            ..PortScript::default()
        },
    );
    let discovery = common::discovery(&bus, vec![]);

    for device in ["empty", "text", "huge", "negative", "nowrite", "noopen", "missing"] {
        assert!(!discovery.probe(device, FAST, FAST), "{} should not pass", device);
    }
    // Every port that opened was closed again
    assert_eq!(bus.closed(), bus.opened().len());
}

#[test]
fn test_autodetect_skips_silent_twin() {
    common::init_tracing();
    let bus = MockBus::new();
    bus.script("COM5", PortScript::default());
    bus.script("COM6", PortScript::replies(&["7\n"]));
    let discovery = common::discovery(&bus, vec![bluetooth("COM6"), bluetooth("COM5")]);

    assert_eq!(discovery.autodetect(&fast_options()), Some("COM6".to_string()));
    assert_eq!(bus.opened(), vec!["COM5".to_string(), "COM6".to_string()]);
}

#[test]
fn test_autodetect_respects_max_candidates() {
    let bus = MockBus::new();
    bus.script("COM5", PortScript::default());
    bus.script("COM6", PortScript::replies(&["7\n"]));
    let discovery = common::discovery(&bus, vec![bluetooth("COM5"), bluetooth("COM6")]);

    let options = AutodetectOptions {
        max_candidates: Some(1),
        ..fast_options()
    };
    assert_eq!(discovery.autodetect(&options), None);
    assert_eq!(bus.opened(), vec!["COM5".to_string()]);

    let options = AutodetectOptions {
        max_candidates: Some(0),
        ..fast_options()
    };
    assert_eq!(discovery.autodetect(&options), None);
}

#[test]
fn test_autodetect_with_no_ports() {
    let bus = MockBus::new();
    assert_eq!(common::discovery(&bus, vec![]).autodetect(&fast_options()), None);
    assert!(bus.opened().is_empty());
}

#[test]
fn test_candidate_serializes() {
    let json = serde_json::to_string(&PortCandidate::new("COM7", "Bluetooth", "BTHENUM")).unwrap();
    assert_eq!(json, r#"{"device":"COM7","description":"Bluetooth","hwid":"BTHENUM"}"#);
}
