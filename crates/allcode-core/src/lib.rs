//! # AllCode Core Library
//!
//! Client library for the Matrix AllCode robot.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - The line-oriented text protocol the robot firmware speaks
//! - Serial and simulated transports behind one trait
//! - Port discovery with a read-only probe that tells Bluetooth SPP twins apart
//! - Per-device wrappers (motors, LEDs, sensors, LCD, SD card, servos, speaker)
//!
//! When no robot answers, every device silently falls back to a built-in
//! simulator, so the same program runs in a classroom without hardware.
//! Setting `ALLCODE_TRANSPORT=simulated` forces the simulator.
//!
//! ## Example
//!
//! ```rust,ignore
//! use allcode_core::prelude::*;
//!
//! let robot = Robot::new();
//! robot.leds.write(0b1010_1010)?;
//! robot.forwards(200)?;
//! println!("front IR: {}", robot.ir_sensors.read_sensor(IrSensor::Front)?);
//! ```

pub mod config;
pub mod device;
pub mod discovery;
pub mod error;
pub mod limits;
pub mod protocol;
pub mod robot;
pub mod transport;
pub mod types;

pub use error::{Result, RobotError};
pub use robot::Robot;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{RobotConfig, TransportMode};
    pub use crate::device::{
        Accelerometer, Device, IrSensors, Lcd, Leds, LightSensor, LineSensors, Mic, PushButtons,
        SdCard, Servos, Speaker,
    };
    pub use crate::discovery::{AutodetectOptions, Discovery, PortCandidate};
    pub use crate::error::{Result, RobotError};
    pub use crate::protocol::{Connection, ConnectionHandle, LinkState, PortSpec};
    pub use crate::robot::Robot;
    pub use crate::transport::{SerialTransport, SimulatedTransport, Transport, TransportKind};
    pub use crate::types::{Axis, BitDepth, Button, Colour, IrSensor, LineSensor, SampleRate, ServoId};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
