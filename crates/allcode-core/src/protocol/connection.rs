//! Connection management
//!
//! Owns the live transport and runs the command/response exchange with the robot.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{verb_of, NO_RESPONSE};
use crate::config::RobotConfig;
use crate::discovery::Discovery;
use crate::error::{Result, RobotError};
use crate::transport::{Transport, TransportKind};

/// Port argument accepted by [`Connection::open`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortSpec {
    /// Platform port number, mapped to a device path per platform
    Index(u32),
    /// A device path or name, used verbatim unless it is all digits
    Name(String),
}

impl PortSpec {
    /// Port number when given as an integer or an all-digit string
    fn as_index(&self) -> Option<&str> {
        match self {
            PortSpec::Index(_) => None,
            PortSpec::Name(name) if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) => {
                Some(name.as_str())
            }
            PortSpec::Name(_) => None,
        }
    }
}

impl From<u32> for PortSpec {
    fn from(index: u32) -> Self {
        PortSpec::Index(index)
    }
}

impl From<&str> for PortSpec {
    fn from(name: &str) -> Self {
        PortSpec::Name(name.to_string())
    }
}

impl From<String> for PortSpec {
    fn from(name: String) -> Self {
        PortSpec::Name(name)
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSpec::Index(index) => write!(f, "{}", index),
            PortSpec::Name(name) => f.write_str(name),
        }
    }
}

/// Host platform, used to turn a port number into a device path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Numbers map to Bluetooth rfcomm nodes
    Linux,
    /// Numbers map to `tty.N-Port` nodes
    MacOs,
    /// Numbers map to COM ports
    Windows,
    /// Anything else, named by `std::env::consts::OS`
    Other(&'static str),
}

impl Platform {
    /// The platform this binary was built for
    pub fn current() -> Self {
        match std::env::consts::OS {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            other => Platform::Other(other),
        }
    }
}

/// Resolve a port argument to the address handed to the transport.
///
/// | Platform | Number `N` maps to |
/// |---|---|
/// | Linux | `/dev/rfcomm{N}` |
/// | macOS | `/dev/tty.{N}-Port` |
/// | Windows | `\\.\COM{N}` |
///
/// Any other platform rejects the number form; names are always used unchanged.
pub fn resolve_address(port: &PortSpec, platform: Platform) -> Result<String> {
    let number = match port {
        PortSpec::Index(index) => index.to_string(),
        PortSpec::Name(name) => match port.as_index() {
            Some(digits) => digits.to_string(),
            None => return Ok(name.clone()),
        },
    };

    match platform {
        Platform::Linux => Ok(format!("/dev/rfcomm{}", number)),
        Platform::MacOs => Ok(format!("/dev/tty.{}-Port", number)),
        Platform::Windows => Ok(format!(r"\\.\COM{}", number)),
        Platform::Other(name) => Err(RobotError::UnsupportedPlatform(name.to_string())),
    }
}

/// Connection lifecycle as seen by device objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkState {
    /// Never opened
    Unconnected,
    /// Open on a physical serial device
    ConnectedReal,
    /// Open on the built-in simulator
    ConnectedSimulated,
    /// Opened at some point, closed now
    Closed,
}

/// Command/response channel to one robot
pub struct Connection {
    /// Live transport, replaced wholesale on fallback
    transport: Box<dyn Transport>,
    /// Diagnostic verbosity (0 = quiet, 1 = traffic, 2 = debug)
    verbose: u8,
    /// Platform used for port-number mapping
    platform: Platform,
    /// Address of the current or most recent session
    address: Option<String>,
}

impl Connection {
    /// Create a connection over `transport` (not yet opened)
    pub fn new(transport: Box<dyn Transport>, verbose: u8) -> Self {
        Self {
            transport,
            verbose,
            platform: Platform::current(),
            address: None,
        }
    }

    /// Override the platform used for port-number mapping
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Diagnostic verbosity
    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    /// Change diagnostic verbosity
    pub fn set_verbose(&mut self, level: u8) {
        self.verbose = level;
    }

    /// Platform used for port-number mapping
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Address of the current or most recent session
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Kind of the installed transport
    pub fn transport_kind(&self) -> TransportKind {
        self.transport.kind()
    }

    /// Whether the transport is open
    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    /// Inbound bytes waiting on the transport
    pub fn in_waiting(&self) -> usize {
        self.transport.in_waiting()
    }

    /// Current link state
    pub fn state(&self) -> LinkState {
        match (self.transport.is_open(), self.transport.kind()) {
            (true, TransportKind::Hardware) => LinkState::ConnectedReal,
            (true, TransportKind::Simulated) => LinkState::ConnectedSimulated,
            (false, _) if self.address.is_some() => LinkState::Closed,
            (false, _) => LinkState::Unconnected,
        }
    }

    /// Open the transport on `port`, returning the resolved address
    pub fn open(&mut self, port: impl Into<PortSpec>) -> Result<String> {
        let port = port.into();
        let address = resolve_address(&port, self.platform)?;
        self.transport.open(&address)?;
        if self.verbose > 0 {
            tracing::info!("Connected on {}", address);
        } else {
            tracing::debug!("connection: opened {}", address);
        }
        self.address = Some(address.clone());
        Ok(address)
    }

    /// Close the transport
    pub fn close(&mut self) {
        self.transport.close();
    }

    /// Discard every line already sitting in the inbound buffer
    pub fn flush_input(&mut self) -> Result<()> {
        while self.transport.in_waiting() > 0 {
            let stale = self.transport.readline()?;
            if stale.is_empty() {
                break;
            }
            tracing::trace!(
                "connection: discarded stale {:?}",
                String::from_utf8_lossy(&stale)
            );
        }
        Ok(())
    }

    /// Write one command, appending the newline terminator when missing
    pub fn send(&mut self, command: &str) -> Result<()> {
        if self.verbose > 0 {
            tracing::info!("-> {}", command.trim());
        } else {
            tracing::debug!("-> {}", command.trim());
        }
        if command.ends_with('\n') {
            self.transport.write(command.as_bytes())
        } else {
            let mut line = String::with_capacity(command.len() + 1);
            line.push_str(command);
            line.push('\n');
            self.transport.write(line.as_bytes())
        }
    }

    /// Read one integer reply, trying up to `attempts` lines (at least one).
    ///
    /// Blank and non-integer lines each consume an attempt. Returns
    /// [`NO_RESPONSE`] once the budget is exhausted.
    pub fn read_value(&mut self, label: &str, attempts: u32) -> Result<i32> {
        let attempts = attempts.max(1);
        for attempt in 1..=attempts {
            let raw = self.transport.readline()?;
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim();
            match line.parse::<i32>() {
                Ok(value) => {
                    if self.verbose > 0 {
                        tracing::info!("<- {}: {}", label, value);
                    } else {
                        tracing::debug!("<- {}: {}", label, value);
                    }
                    return Ok(value);
                }
                Err(_) => {
                    if self.verbose > 0 {
                        tracing::info!("<- {}: no valid int (attempt {})", label, attempt);
                    } else {
                        tracing::debug!("<- {}: no valid int in {:?} (attempt {})", label, line, attempt);
                    }
                }
            }
        }
        Ok(NO_RESPONSE)
    }

    /// Flush, send `command`, and optionally await its integer reply.
    ///
    /// Returns `None` for fire-and-forget commands.
    pub fn execute(
        &mut self,
        command: &str,
        expect_response: bool,
        attempts: u32,
    ) -> Result<Option<i32>> {
        self.flush_input()?;
        self.send(command)?;

        if expect_response {
            return self.read_value(verb_of(command), attempts).map(Some);
        }

        if self.transport.echo() {
            println!("[SimulatedRobot] OK: {}", command.trim());
        }
        Ok(None)
    }

    /// Execute a command that answers with an integer
    pub fn query(&mut self, command: &str, attempts: u32) -> Result<i32> {
        Ok(self
            .execute(command, true, attempts)?
            .unwrap_or(NO_RESPONSE))
    }

    /// Execute a fire-and-forget command
    pub fn command(&mut self, command: &str) -> Result<()> {
        self.execute(command, false, 1).map(|_| ())
    }

    /// Swap in a new transport, closing and dropping the old one
    pub(crate) fn replace_transport(&mut self, transport: Box<dyn Transport>) {
        let mut old = std::mem::replace(&mut self.transport, transport);
        old.close();
    }

    /// Install `transport` and open it on `label` as given, without port mapping
    pub(crate) fn open_with(&mut self, transport: Box<dyn Transport>, label: &str) -> Result<()> {
        self.replace_transport(transport);
        self.transport.open(label)?;
        self.address = Some(label.to_string());
        Ok(())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.transport.close();
    }
}

/// Shared handle to one [`Connection`], cloned into every device of a robot.
///
/// The handle also carries the config and discovery the connection was built
/// with, so a device joining it later reopens under the same rules.
#[derive(Clone)]
pub struct ConnectionHandle {
    inner: Arc<Mutex<Connection>>,
    config: Arc<RobotConfig>,
    discovery: Arc<Discovery>,
}

impl ConnectionHandle {
    /// Wrap `connection` with the environment's config and the system's ports
    pub fn new(connection: Connection) -> Self {
        Self::with_settings(connection, RobotConfig::from_env(), Arc::new(Discovery::system()))
    }

    /// Wrap `connection` together with the config and discovery used to reopen it
    pub fn with_settings(
        connection: Connection,
        config: RobotConfig,
        discovery: Arc<Discovery>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(connection)),
            config: Arc::new(config),
            discovery,
        }
    }

    /// Lock the connection for direct use
    pub fn lock(&self) -> MutexGuard<'_, Connection> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Config every device on this connection opens with
    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// Port discovery every device on this connection opens with
    pub fn discovery(&self) -> &Arc<Discovery> {
        &self.discovery
    }

    /// See [`Connection::execute`]
    pub fn execute(
        &self,
        command: &str,
        expect_response: bool,
        attempts: u32,
    ) -> Result<Option<i32>> {
        self.lock().execute(command, expect_response, attempts)
    }

    /// See [`Connection::query`]
    pub fn query(&self, command: &str, attempts: u32) -> Result<i32> {
        self.lock().query(command, attempts)
    }

    /// See [`Connection::command`]
    pub fn command(&self, command: &str) -> Result<()> {
        self.lock().command(command)
    }

    /// Current link state
    pub fn state(&self) -> LinkState {
        self.lock().state()
    }

    /// True when both handles point at the same connection
    pub fn same_connection(&self, other: &ConnectionHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<Connection> for ConnectionHandle {
    fn from(connection: Connection) -> Self {
        ConnectionHandle::new(connection)
    }
}
