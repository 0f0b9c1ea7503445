//! Byte-level transports
//!
//! A [`Transport`] is the line-oriented channel a [`Connection`](crate::protocol::Connection)
//! talks through. Two implementations ship with the crate:
//!
//! - [`SerialTransport`]: a real serial device (USB UART or Bluetooth SPP)
//! - [`SimulatedTransport`]: an in-memory robot that synthesizes plausible replies

pub mod serial;
pub mod simulated;

pub use serial::{SerialSettings, SerialTransport};
pub use simulated::{SimulatedReply, SimulatedTransport};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which kind of channel sits behind a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportKind {
    /// A physical serial device
    Hardware,
    /// The built-in simulator
    Simulated,
}

/// Capability set shared by every transport.
///
/// `write` and `readline` fail with [`RobotError::NotOpen`](crate::RobotError::NotOpen)
/// while the transport is closed; `in_waiting` reports 0 instead of failing.
pub trait Transport: Send {
    /// Open the channel at `address` (a device path or a cosmetic label)
    fn open(&mut self, address: &str) -> Result<()>;

    /// Close the channel. Calling this on a closed transport is a no-op.
    fn close(&mut self);

    /// Write raw bytes
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Read one line, blocking up to the transport's read timeout.
    ///
    /// Returns an empty vector when nothing arrived in time.
    fn readline(&mut self) -> Result<Vec<u8>>;

    /// Number of inbound bytes that can be read without blocking
    fn in_waiting(&self) -> usize;

    /// Whether the channel is currently open
    fn is_open(&self) -> bool;

    /// The kind of channel
    fn kind(&self) -> TransportKind;

    /// Whether status lines are printed to stdout for the user
    fn echo(&self) -> bool {
        false
    }
}
