//! The whole robot
//!
//! [`Robot`] owns one connection and hands it to every device, so all devices
//! talk over the same link and follow the same fallback rules.

use std::sync::Arc;

use crate::config::RobotConfig;
use crate::device::{
    Accelerometer, Device, DeviceBase, IrSensors, Lcd, Leds, LightSensor, LineSensors, Mic,
    PushButtons, SdCard, Servos, Speaker,
};
use crate::discovery::{AutodetectOptions, Discovery, PortCandidate};
use crate::error::Result;
use crate::limits::{self, ANGLE_DEG, DISTANCE_MM, MOTOR_SPEED};
use crate::protocol::{CommandLine, ConnectionHandle, LinkState, PortSpec, Verb};

/// Reply budget for a movement: roughly one attempt per second of travel
fn movement_attempts(amount: i64, rate: u32) -> u32 {
    let seconds = (amount / i64::from(rate.max(1))).unsigned_abs();
    seconds.clamp(1, u64::from(u32::MAX)) as u32
}

/// An AllCode robot with every device attached to one connection
pub struct Robot {
    base: DeviceBase,
    mm_per_sec: u32,
    deg_per_sec: u32,
    /// Three-axis accelerometer
    pub accelerometer: Accelerometer,
    /// Left and right push buttons
    pub push_buttons: PushButtons,
    /// IR distance sensors
    pub ir_sensors: IrSensors,
    /// Display
    pub lcd: Lcd,
    /// LED bar
    pub leds: Leds,
    /// Ambient light sensor
    pub light_sensor: LightSensor,
    /// Line-following sensors
    pub line_sensors: LineSensors,
    /// Microphone
    pub mic: Mic,
    /// SD card slot
    pub sd_card: SdCard,
    /// Servo header
    pub servos: Servos,
    /// Speaker
    pub speaker: Speaker,
}

impl Robot {
    /// Robot configured from the environment
    pub fn new() -> Self {
        Self::with_config(RobotConfig::from_env())
    }

    /// Robot using the system's ports
    pub fn with_config(config: RobotConfig) -> Self {
        Self::with_discovery(config, Arc::new(Discovery::system()))
    }

    /// Robot using `discovery` for ports and hardware transports
    pub fn with_discovery(config: RobotConfig, discovery: Arc<Discovery>) -> Self {
        let mm_per_sec = config.mm_per_sec();
        let deg_per_sec = config.deg_per_sec();
        let base = DeviceBase::standalone_with(config, discovery);

        let share = || DeviceBase::shared(base.connection().clone());

        Self {
            accelerometer: Accelerometer::from_base(share()),
            push_buttons: PushButtons::from_base(share()),
            ir_sensors: IrSensors::from_base(share()),
            lcd: Lcd::from_base(share()),
            leds: Leds::from_base(share()),
            light_sensor: LightSensor::from_base(share()),
            line_sensors: LineSensors::from_base(share()),
            mic: Mic::from_base(share()),
            sd_card: SdCard::from_base(share()),
            servos: Servos::from_base(share()),
            speaker: Speaker::from_base(share()),
            base,
            mm_per_sec,
            deg_per_sec,
        }
    }

    /// Handle shared by every device
    pub fn connection(&self) -> &ConnectionHandle {
        self.base.connection()
    }

    /// Open `port`, falling back to the simulator; returns the address or label
    pub fn open(&self, port: impl Into<PortSpec>) -> String {
        self.base.open(Some(port.into()))
    }

    /// Autodetect and open with `options`, falling back to the simulator
    pub fn autoconnect(&self, options: &AutodetectOptions) -> String {
        self.base.autoconnect(options)
    }

    /// Close the connection
    pub fn close(&self) {
        self.base.close()
    }

    /// Set diagnostic verbosity
    pub fn set_verbose(&self, level: u8) {
        self.base.set_verbose(level)
    }

    /// Current link state
    pub fn link_state(&self) -> LinkState {
        self.base.link_state()
    }

    /// Firmware API version
    pub fn get_api_version(&self) -> Result<i32> {
        self.base.query(&CommandLine::new(Verb::GetAPIVersion), 1)
    }

    /// Battery voltage in millivolts
    pub fn get_battery_voltage(&self) -> Result<i32> {
        self.base
            .query(&CommandLine::new(Verb::GetBatteryVoltage), 1)
    }

    /// Drive both motors continuously at the given speeds
    pub fn set_motors(&self, left: i64, right: i64) -> Result<()> {
        limits::check("left speed", left, MOTOR_SPEED)?;
        limits::check("right speed", right, MOTOR_SPEED)?;
        self.base
            .command(&CommandLine::new(Verb::SetMotors).arg(left).arg(right))
    }

    /// Drive forwards `distance_mm`, waiting for the move to finish
    pub fn forwards(&self, distance_mm: i64) -> Result<i32> {
        self.travel(Verb::Forwards, distance_mm)
    }

    /// Drive backwards `distance_mm`, waiting for the move to finish
    pub fn backwards(&self, distance_mm: i64) -> Result<i32> {
        self.travel(Verb::Backwards, distance_mm)
    }

    /// Turn left `angle_deg` on the spot
    pub fn left(&self, angle_deg: i64) -> Result<i32> {
        self.turn(Verb::Left, angle_deg)
    }

    /// Turn right `angle_deg` on the spot
    pub fn right(&self, angle_deg: i64) -> Result<i32> {
        self.turn(Verb::Right, angle_deg)
    }

    fn travel(&self, verb: Verb, distance_mm: i64) -> Result<i32> {
        limits::check("distance", distance_mm, DISTANCE_MM)?;
        self.base.query(
            &CommandLine::new(verb).arg(distance_mm),
            movement_attempts(distance_mm, self.mm_per_sec),
        )
    }

    fn turn(&self, verb: Verb, angle_deg: i64) -> Result<i32> {
        limits::check("angle", angle_deg, ANGLE_DEG)?;
        self.base.query(
            &CommandLine::new(verb).arg(angle_deg),
            movement_attempts(angle_deg, self.deg_per_sec),
        )
    }

    /// Every serial port on this machine
    pub fn list_ports() -> Vec<PortCandidate> {
        Discovery::system().list_ports()
    }

    /// Ports that look like a robot or a serial adapter
    pub fn find_likely() -> Vec<PortCandidate> {
        Discovery::system().find_likely()
    }

    /// Port names, most likely robot first
    pub fn rank() -> Vec<String> {
        Discovery::system().rank()
    }

    /// First port that answers the handshake
    pub fn autodetect(options: &AutodetectOptions) -> Option<String> {
        Discovery::system().autodetect(options)
    }
}

impl Default for Robot {
    fn default() -> Self {
        Self::new()
    }
}
