//! Serial port transport
//!
//! Line-oriented access to the robot over a real serial device.

use serde::{Deserialize, Serialize};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use super::{Transport, TransportKind};
use crate::error::{Result, RobotError};
use crate::protocol::{DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT_MS, DEFAULT_WRITE_TIMEOUT_MS};

/// Serial line settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Baud rate
    pub baud_rate: u32,
    /// Read timeout for a single `readline` in milliseconds
    pub read_timeout_ms: u64,
    /// Write timeout in milliseconds
    pub write_timeout_ms: u64,
    /// Data bits, always 8 for the robot
    #[serde(skip, default = "default_data_bits")]
    pub data_bits: DataBits,
    /// Parity, always none
    #[serde(skip, default = "default_parity")]
    pub parity: Parity,
    /// Stop bits, always 1
    #[serde(skip, default = "default_stop_bits")]
    pub stop_bits: StopBits,
}

fn default_data_bits() -> DataBits {
    DataBits::Eight
}

fn default_parity() -> Parity {
    Parity::None
}

fn default_stop_bits() -> StopBits {
    StopBits::One
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT_MS,
            data_bits: default_data_bits(),
            parity: default_parity(),
            stop_bits: default_stop_bits(),
        }
    }
}

impl SerialSettings {
    /// Settings with explicit read and write timeouts, otherwise default 8N1 at 115200
    pub fn with_timeouts(read_timeout: Duration, write_timeout: Duration) -> Self {
        Self {
            read_timeout_ms: read_timeout.as_millis() as u64,
            write_timeout_ms: write_timeout.as_millis() as u64,
            ..Self::default()
        }
    }

    /// Timeout for one `readline`
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Timeout for one write
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

/// Transport backed by a physical serial device
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    settings: SerialSettings,
    /// Bytes received past the last returned line
    pending: Vec<u8>,
}

impl SerialTransport {
    /// Closed transport that will open with `settings`
    pub fn new(settings: SerialSettings) -> Self {
        Self {
            port: None,
            settings,
            pending: Vec::new(),
        }
    }

    /// Line settings used on open
    pub fn settings(&self) -> &SerialSettings {
        &self.settings
    }
}

impl Default for SerialTransport {
    fn default() -> Self {
        Self::new(SerialSettings::default())
    }
}

/// Split the first complete line (newline included) off the front of `buf`
fn take_line(buf: &mut Vec<u8>) -> Option<Vec<u8>> {
    let end = buf.iter().position(|&b| b == b'\n')?;
    let rest = buf.split_off(end + 1);
    Some(std::mem::replace(buf, rest))
}

impl Transport for SerialTransport {
    fn open(&mut self, address: &str) -> Result<()> {
        if self.port.is_some() {
            self.close();
        }

        let port = serialport::new(address, self.settings.baud_rate)
            .data_bits(self.settings.data_bits)
            .parity(self.settings.parity)
            .stop_bits(self.settings.stop_bits)
            .flow_control(FlowControl::None)
            .timeout(self.settings.read_timeout())
            .open()
            .map_err(|e| RobotError::OpenFailed {
                port: address.to_string(),
                reason: e.to_string(),
            })?;

        if let Err(e) = port.clear(serialport::ClearBuffer::All) {
            tracing::debug!("serial: could not clear buffers on {}: {}", address, e);
        }

        tracing::debug!(
            "serial: opened {} at {} baud (read timeout {}ms)",
            address,
            self.settings.baud_rate,
            self.settings.read_timeout_ms
        );
        self.pending.clear();
        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            tracing::debug!("serial: closed");
        }
        self.pending.clear();
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(RobotError::NotOpen)?;

        let swap_timeouts = self.settings.write_timeout_ms != self.settings.read_timeout_ms;
        if swap_timeouts {
            port.set_timeout(self.settings.write_timeout())?;
        }
        let written = port.write_all(data).and_then(|_| port.flush());
        if swap_timeouts {
            port.set_timeout(self.settings.read_timeout())?;
        }
        written?;
        Ok(())
    }

    fn readline(&mut self) -> Result<Vec<u8>> {
        let port = self.port.as_mut().ok_or(RobotError::NotOpen)?;

        if let Some(line) = take_line(&mut self.pending) {
            return Ok(line);
        }

        let deadline = Instant::now() + self.settings.read_timeout();
        let mut buffer = [0u8; 256];

        loop {
            match port.read(&mut buffer) {
                Ok(0) => {}
                Ok(n) => {
                    self.pending.extend_from_slice(&buffer[..n]);
                    if let Some(line) = take_line(&mut self.pending) {
                        return Ok(line);
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => {}
                Err(e) => return Err(e.into()),
            }

            if Instant::now() >= deadline {
                break;
            }
        }

        // Timed out: hand back whatever partial line arrived, possibly nothing
        Ok(std::mem::take(&mut self.pending))
    }

    fn in_waiting(&self) -> usize {
        match &self.port {
            Some(port) => port.bytes_to_read().unwrap_or(0) as usize + self.pending.len(),
            None => 0,
        }
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Hardware
    }
}
