mod common;

use allcode_core::protocol::{
    resolve_address, Connection, ConnectionHandle, LinkState, Platform, PortSpec, NO_RESPONSE,
};
use allcode_core::transport::TransportKind;
use allcode_core::RobotError;
use common::{MockBus, PortScript};
use pretty_assertions::assert_eq;

fn connected(script: PortScript) -> (MockBus, Connection) {
    common::init_tracing();
    let bus = MockBus::new();
    bus.script("mock", script);
    let mut conn = Connection::new(Box::new(bus.transport()), 0);
    conn.open("mock").unwrap();
    (bus, conn)
}

#[test]
fn test_platform_mapping() {
    let cases = [
        (Platform::Linux, "/dev/rfcomm0"),
        (Platform::MacOs, "/dev/tty.0-Port"),
        (Platform::Windows, r"\\.\COM0"),
    ];
    for (platform, expected) in cases {
        assert_eq!(resolve_address(&PortSpec::Index(0), platform).unwrap(), expected);
        assert_eq!(resolve_address(&PortSpec::from("0"), platform).unwrap(), expected);
    }
    assert!(matches!(
        resolve_address(&PortSpec::Index(0), Platform::Other("plan9")),
        Err(RobotError::UnsupportedPlatform(_))
    ));
    assert_eq!(
        resolve_address(&PortSpec::from("/dev/ttyUSB0"), Platform::Linux).unwrap(),
        "/dev/ttyUSB0"
    );
}

#[test]
fn test_open_index_uses_platform() {
    let bus = MockBus::new();
    bus.script(r"\\.\COM4", PortScript::default());
    let mut conn = Connection::new(Box::new(bus.transport()), 0).with_platform(Platform::Windows);
    assert_eq!(conn.open(4u32).unwrap(), r"\\.\COM4");
    assert_eq!(bus.opened(), vec![r"\\.\COM4".to_string()]);
    assert_eq!(conn.state(), LinkState::ConnectedReal);
}

#[test]
fn test_open_on_unsupported_platform_fails() {
    let bus = MockBus::new();
    let mut conn =
        Connection::new(Box::new(bus.transport()), 0).with_platform(Platform::Other("plan9"));
    assert!(matches!(conn.open(1u32), Err(RobotError::UnsupportedPlatform(_))));
    assert_eq!(conn.state(), LinkState::Unconnected);
}

#[test]
fn test_flush_drains_stale_lines() {
    let (bus, mut conn) = connected(PortScript {
        stale: vec!["1\n", "2\n"],
        replies: vec!["9\n"],
        ..PortScript::default()
    });
    assert!(conn.in_waiting() > 0);
    conn.flush_input().unwrap();
    assert_eq!(conn.in_waiting(), 0);
    assert_eq!(bus.reads(), 2);
    assert_eq!(conn.query("ReadLight", 1).unwrap(), 9);
}

#[test]
fn test_stale_reply_is_not_mistaken_for_answer() {
    let (_bus, mut conn) = connected(PortScript {
        stale: vec!["123\n"],
        replies: vec!["4\n"],
        ..PortScript::default()
    });
    assert_eq!(conn.query("ReadIR 2", 1).unwrap(), 4);
}

#[test]
fn test_execute_appends_one_newline() {
    let (bus, mut conn) = connected(PortScript::replies(&["1\n", "1\n"]));
    conn.execute("CardInit", true, 1).unwrap();
    conn.execute("CardInit\n", true, 1).unwrap();
    assert_eq!(bus.writes(), vec!["CardInit\n".to_string(), "CardInit\n".to_string()]);
}

#[test]
fn test_fire_and_forget_never_reads() {
    let (bus, mut conn) = connected(PortScript::replies(&["5\n"]));
    assert_eq!(conn.execute("LEDWrite 5", false, 1).unwrap(), None);
    assert_eq!(bus.writes(), vec!["LEDWrite 5\n".to_string()]);
    assert_eq!(bus.reads(), 0);
}

#[test]
fn test_retry_after_malformed_line() {
    let (_bus, mut conn) = connected(PortScript::replies(&["bad\n", "7\n"]));
    assert_eq!(conn.execute("GetAPIVersion", true, 2).unwrap(), Some(7));
}

#[test]
fn test_attempt_budget() {
    // N-1 malformed lines then a valid one
    let (_bus, mut conn) = connected(PortScript::replies(&["", "x\n", "  \n", "-12\n"]));
    assert_eq!(conn.read_value("ReadAxis", 4).unwrap(), -12);

    // N malformed lines
    let (_bus, mut conn) = connected(PortScript::replies(&["", "x\n", "1.5\n", "8\n"]));
    assert_eq!(conn.read_value("ReadAxis", 3).unwrap(), NO_RESPONSE);
}

#[test]
fn test_zero_attempts_reads_once() {
    let (bus, mut conn) = connected(PortScript::replies(&["3\n"]));
    assert_eq!(conn.read_value("ReadMic", 0).unwrap(), 3);
    assert_eq!(bus.reads(), 1);
}

#[test]
fn test_zero_reply_is_kept() {
    let (_bus, mut conn) = connected(PortScript::replies(&["0\n"]));
    assert_eq!(conn.query("ReadLine 0", 1).unwrap(), 0);
}

#[test]
fn test_closed_connection_reports_not_open() {
    let (_bus, mut conn) = connected(PortScript::default());
    conn.close();
    assert_eq!(conn.state(), LinkState::Closed);
    assert!(matches!(conn.command("LEDOn 1"), Err(RobotError::NotOpen)));
    assert!(matches!(conn.query("ReadMic", 1), Err(RobotError::NotOpen)));
}

#[test]
fn test_write_failure_surfaces() {
    let (_bus, mut conn) = connected(PortScript {
        fail_write: true,
        ..PortScript::default()
    });
    assert!(matches!(conn.command("LEDOn 1"), Err(RobotError::Io(_))));
}

#[test]
fn test_handle_shares_state() {
    common::init_tracing();
    let bus = MockBus::new();
    bus.script("mock", PortScript::replies(&["42\n"]));
    let handle = ConnectionHandle::new(Connection::new(Box::new(bus.transport()), 1));
    let other = handle.clone();
    handle.lock().open("mock").unwrap();
    assert_eq!(other.state(), LinkState::ConnectedReal);
    assert_eq!(other.lock().transport_kind(), TransportKind::Hardware);
    assert_eq!(handle.query("GetBatteryVoltage", 1).unwrap(), 42);
    assert!(handle.same_connection(&other));
}
