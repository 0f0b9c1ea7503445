//! Device facade
//!
//! Every device wrapper sits on a [`DeviceBase`], which either shares a robot's
//! connection or manages its own. A self-managed connection tries the hardware
//! first and falls back to the simulator without surfacing an error, so the
//! same student program runs with or without a robot attached.

use std::sync::Arc;

use crate::config::{RobotConfig, TransportMode};
use crate::discovery::{AutodetectOptions, Discovery};
use crate::error::{Result, RobotError};
use crate::protocol::{
    CommandLine, Connection, ConnectionHandle, LinkState, PortSpec, NO_RESPONSE,
};
use crate::transport::Transport;

mod accelerometer;
mod buttons;
mod ir;
mod lcd;
mod leds;
mod light;
mod line;
mod mic;
mod sdcard;
mod servos;
mod speaker;

pub use accelerometer::Accelerometer;
pub use buttons::PushButtons;
pub use ir::IrSensors;
pub use lcd::Lcd;
pub use leds::Leds;
pub use light::LightSensor;
pub use line::LineSensors;
pub use mic::Mic;
pub use sdcard::SdCard;
pub use servos::Servos;
pub use speaker::Speaker;

/// Label the simulator is opened with when hardware is unavailable
pub fn fallback_label(port: Option<&PortSpec>) -> String {
    match port {
        None => "SIMULATED".to_string(),
        Some(PortSpec::Name(name)) => name.clone(),
        Some(PortSpec::Index(index)) => format!("SIMULATED-{}", index),
    }
}

/// Connection owner shared by all device wrappers.
///
/// Config and discovery travel with the [`ConnectionHandle`], so devices that
/// share a connection always reopen it the same way.
#[derive(Clone)]
pub struct DeviceBase {
    connection: ConnectionHandle,
}

impl DeviceBase {
    /// Use an existing connection, inheriting the config it was built with
    pub fn shared(connection: ConnectionHandle) -> Self {
        Self { connection }
    }

    /// Private connection using the system's ports
    pub fn standalone(config: RobotConfig) -> Self {
        Self::standalone_with(config, Arc::new(Discovery::system()))
    }

    /// Private connection using `discovery` for ports and hardware transports
    pub fn standalone_with(config: RobotConfig, discovery: Arc<Discovery>) -> Self {
        let transport: Box<dyn Transport> = match config.transport {
            TransportMode::Simulated => Box::new(config.simulator()),
            TransportMode::Auto => discovery.factory().hardware(&config.serial),
        };
        let connection = Connection::new(transport, config.verbose);
        let autoconnect = config.autoconnect;
        let port = config.port.clone();
        let base = Self {
            connection: ConnectionHandle::with_settings(connection, config, discovery),
        };

        if autoconnect {
            base.open(port);
        }
        base
    }

    /// Handle to the underlying connection
    pub fn connection(&self) -> &ConnectionHandle {
        &self.connection
    }

    /// Config used when (re)opening the connection
    pub fn config(&self) -> &RobotConfig {
        self.connection.config()
    }

    /// Port discovery used by autodetect
    pub fn discovery(&self) -> &Discovery {
        self.connection.discovery()
    }

    /// Open on `port` (or autodetect), falling back to the simulator.
    ///
    /// Returns the hardware address on success, otherwise the simulator label.
    pub fn open(&self, port: Option<PortSpec>) -> String {
        self.connect(port, &self.config().discovery)
    }

    /// Autodetect with `options`, falling back to the simulator
    pub fn autoconnect(&self, options: &AutodetectOptions) -> String {
        self.connect(None, options)
    }

    /// Close the connection
    pub fn close(&self) {
        self.connection.lock().close();
    }

    /// Set diagnostic verbosity on the connection
    pub fn set_verbose(&self, level: u8) {
        self.connection.lock().set_verbose(level);
    }

    /// Current link state
    pub fn link_state(&self) -> LinkState {
        self.connection.state()
    }

    /// Send `command`, reading a reply only when its verb answers with one
    pub fn execute(&self, command: &CommandLine, attempts: u32) -> Result<Option<i32>> {
        let expect_response = command.verb().expects_response();
        self.connection
            .execute(command.as_str(), expect_response, attempts)
    }

    /// Send a command and wait for its integer reply.
    ///
    /// Verbs the firmware never answers yield [`NO_RESPONSE`] without a read.
    pub fn query(&self, command: &CommandLine, attempts: u32) -> Result<i32> {
        Ok(self.execute(command, attempts)?.unwrap_or(NO_RESPONSE))
    }

    /// Send a command whose reply, if any, is not needed
    pub fn command(&self, command: &CommandLine) -> Result<()> {
        self.execute(command, 1).map(|_| ())
    }

    fn connect(&self, port: Option<PortSpec>, options: &AutodetectOptions) -> String {
        let label = fallback_label(port.as_ref());
        let config = self.config();
        let discovery = self.discovery();
        let mut conn = self.connection.lock();

        if config.transport == TransportMode::Simulated {
            if conn.verbose() > 0 {
                tracing::info!("Simulated transport forced by configuration");
            }
            install_simulator(config, &mut conn, &label);
            return label;
        }

        conn.replace_transport(discovery.factory().hardware(&config.serial));
        let attempt = match port {
            Some(port) => conn.open(port),
            None => match discovery.autodetect(options) {
                Some(device) => conn.open(device),
                None => Err(RobotError::NoRobotFound),
            },
        };

        match attempt {
            Ok(address) => address,
            Err(e) => {
                if conn.verbose() > 0 {
                    tracing::warn!("Using simulated transport: {}", e);
                } else {
                    tracing::debug!("facade: hardware unavailable ({}), using simulator", e);
                }
                install_simulator(config, &mut conn, &label);
                label
            }
        }
    }
}

fn install_simulator(config: &RobotConfig, conn: &mut Connection, label: &str) {
    if let Err(e) = conn.open_with(Box::new(config.simulator()), label) {
        tracing::warn!("facade: simulator failed to open on {}: {}", label, e);
    }
}

/// Behavior shared by every device wrapper
pub trait Device: Sized {
    /// Wrap a facade
    fn from_base(base: DeviceBase) -> Self;

    /// The facade this device talks through
    fn base(&self) -> &DeviceBase;

    /// Device on an existing connection, typically a robot's
    fn with_connection(connection: ConnectionHandle) -> Self {
        Self::from_base(DeviceBase::shared(connection))
    }

    /// Device with its own connection
    fn standalone(config: RobotConfig) -> Self {
        Self::from_base(DeviceBase::standalone(config))
    }

    /// Device with its own connection over `discovery`
    fn standalone_with(config: RobotConfig, discovery: Arc<Discovery>) -> Self {
        Self::from_base(DeviceBase::standalone_with(config, discovery))
    }

    /// Device with its own connection, configured from the environment
    fn new() -> Self {
        Self::standalone(RobotConfig::from_env())
    }

    /// See [`DeviceBase::open`]
    fn open(&self, port: Option<PortSpec>) -> String {
        self.base().open(port)
    }

    /// Close the connection
    fn close(&self) {
        self.base().close()
    }

    /// Set diagnostic verbosity
    fn set_verbose(&self, level: u8) {
        self.base().set_verbose(level)
    }

    /// Current link state
    fn link_state(&self) -> LinkState {
        self.base().link_state()
    }

    /// Handle to the underlying connection
    fn connection(&self) -> &ConnectionHandle {
        self.base().connection()
    }
}
