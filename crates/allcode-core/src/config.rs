//! Robot configuration
//!
//! Everything a standalone device or a [`crate::Robot`] needs to build its
//! connection. The environment is consulted only by [`RobotConfig::from_env`]
//! and [`RobotConfig::load`]; components receive a finished config.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::discovery::AutodetectOptions;
use crate::error::{Result, RobotError};
use crate::protocol::PortSpec;
use crate::transport::{SerialSettings, SimulatedTransport};

/// Environment variable that forces the simulated transport
pub const TRANSPORT_ENV_VAR: &str = "ALLCODE_TRANSPORT";

/// Default forward/backward speed used to size movement reply budgets
pub const DEFAULT_MM_PER_SEC: u32 = 50;

/// Default turning speed used to size movement reply budgets
pub const DEFAULT_DEG_PER_SEC: u32 = 45;

/// Which transport a new connection should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Try hardware, fall back to the simulator
    #[default]
    Auto,
    /// Always use the simulator
    Simulated,
}

impl TransportMode {
    /// Interpret the value of [`TRANSPORT_ENV_VAR`].
    ///
    /// Only `simulated` (trimmed, any case) forces simulation.
    pub fn from_env_value(value: Option<&str>) -> Option<TransportMode> {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("simulated") => Some(TransportMode::Simulated),
            _ => None,
        }
    }
}

/// Connection settings for a robot or standalone device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Hardware with fallback, or simulator only
    pub transport: TransportMode,
    /// Explicit port; `None` autodetects
    pub port: Option<PortSpec>,
    /// Connect during construction
    pub autoconnect: bool,
    /// Diagnostic verbosity (0 = quiet)
    pub verbose: u8,
    /// Serial line settings for hardware sessions
    pub serial: SerialSettings,
    /// Autodetect tuning used when no port is given
    pub discovery: AutodetectOptions,
    /// Expected driving speed, for movement reply budgets
    pub mm_per_sec: u32,
    /// Expected turning speed, for movement reply budgets
    pub deg_per_sec: u32,
    /// Fixed seed for the simulator; `None` seeds from entropy
    pub simulator_seed: Option<u64>,
    /// Silence the simulator's stdout status lines
    pub quiet_simulator: bool,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            transport: TransportMode::Auto,
            port: None,
            autoconnect: true,
            verbose: 0,
            serial: SerialSettings::default(),
            discovery: AutodetectOptions::default(),
            mm_per_sec: DEFAULT_MM_PER_SEC,
            deg_per_sec: DEFAULT_DEG_PER_SEC,
            simulator_seed: None,
            quiet_simulator: false,
        }
    }
}

impl RobotConfig {
    /// Default config with the environment override applied
    pub fn from_env() -> Self {
        Self::default().with_env_override()
    }

    /// Read a JSON config file, then apply the environment override
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: RobotConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config.with_env_override())
    }

    /// Force simulation when [`TRANSPORT_ENV_VAR`] asks for it
    pub fn with_env_override(self) -> Self {
        let value = std::env::var(TRANSPORT_ENV_VAR).ok();
        self.with_transport_override(value.as_deref())
    }

    /// Apply an override value as read from the environment
    pub fn with_transport_override(mut self, value: Option<&str>) -> Self {
        if let Some(mode) = TransportMode::from_env_value(value) {
            self.transport = mode;
        }
        self
    }

    /// Simulated config, for tests and classroom demos
    pub fn simulated() -> Self {
        Self {
            transport: TransportMode::Simulated,
            ..Self::default()
        }
    }

    /// Use `port` instead of autodetect
    pub fn with_port(mut self, port: impl Into<PortSpec>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Set diagnostic verbosity
    pub fn with_verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Connect during construction, or wait for an explicit `open`
    pub fn with_autoconnect(mut self, autoconnect: bool) -> Self {
        self.autoconnect = autoconnect;
        self
    }

    /// Seed the simulator for reproducible replies
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.simulator_seed = Some(seed);
        self
    }

    /// Turn the simulator's stdout echo off or on
    pub fn with_quiet_simulator(mut self, quiet: bool) -> Self {
        self.quiet_simulator = quiet;
        self
    }

    /// Build a simulator according to the seed and echo settings
    pub(crate) fn simulator(&self) -> SimulatedTransport {
        let simulator = match self.simulator_seed {
            Some(seed) => SimulatedTransport::with_seed(seed),
            None => SimulatedTransport::new(),
        };
        if self.quiet_simulator {
            simulator.quiet()
        } else {
            simulator
        }
    }

    /// Reject settings no serial link can use
    pub fn validate(&self) -> Result<()> {
        if self.serial.baud_rate == 0 {
            return Err(RobotError::Config("baud_rate must be positive".to_string()));
        }
        if self.serial.read_timeout_ms == 0 {
            return Err(RobotError::Config("read_timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// Movement speed, never below 1 mm/s
    pub fn mm_per_sec(&self) -> u32 {
        self.mm_per_sec.max(1)
    }

    /// Turning speed, never below 1 deg/s
    pub fn deg_per_sec(&self) -> u32 {
        self.deg_per_sec.max(1)
    }
}
