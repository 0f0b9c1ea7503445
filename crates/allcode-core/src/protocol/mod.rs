//! Robot Text Protocol
//!
//! Implements the line-oriented AllCode protocol: one text command per line,
//! answered (for query verbs) by one line holding a base-10 signed integer.

pub mod commands;
mod connection;

pub use commands::{CommandLine, Verb};
pub use connection::{
    resolve_address, Connection, ConnectionHandle, LinkState, Platform, PortSpec,
};

/// Default baud rate for the robot's serial link
pub const DEFAULT_BAUD_RATE: u32 = 115200;

/// Default read timeout for one reply line in milliseconds
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// Default write timeout in milliseconds
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 1000;

/// Value returned when no valid integer reply arrived within the attempt budget
pub const NO_RESPONSE: i32 = -1;

/// Read-only handshake used to recognise the robot on a candidate port
pub const PROBE_COMMAND: &str = "GetAPIVersion\n";

/// First whitespace-delimited token of a command line
pub(crate) fn verb_of(command: &str) -> &str {
    command.split_whitespace().next().unwrap_or("")
}
