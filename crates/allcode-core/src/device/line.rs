//! Downward-facing line sensors

use super::{Device, DeviceBase};
use crate::error::Result;
use crate::limits::{self, LINE_SENSOR};
use crate::protocol::{CommandLine, Verb, NO_RESPONSE};
use crate::types::LineSensor;

/// The two line-following sensors
pub struct LineSensors {
    base: DeviceBase,
}

impl Device for LineSensors {
    fn from_base(base: DeviceBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &DeviceBase {
        &self.base
    }
}

impl LineSensors {
    /// True when sensor `index` sees a line.
    ///
    /// A missing reply counts as no line.
    pub fn read(&self, index: i64) -> Result<bool> {
        limits::check("line sensor", index, LINE_SENSOR)?;
        let value = self
            .base
            .query(&CommandLine::new(Verb::ReadLine).arg(index), 1)?;
        Ok(value != 0 && value != NO_RESPONSE)
    }

    /// Whether `sensor` sees a line
    pub fn read_sensor(&self, sensor: LineSensor) -> Result<bool> {
        self.read(sensor.index())
    }
}
