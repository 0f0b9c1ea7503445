//! IR distance sensors

use super::{Device, DeviceBase};
use crate::error::Result;
use crate::limits::{self, IR_SENSOR};
use crate::protocol::{CommandLine, Verb};
use crate::types::IrSensor;

/// The eight IR distance sensors
pub struct IrSensors {
    base: DeviceBase,
}

impl Device for IrSensors {
    fn from_base(base: DeviceBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &DeviceBase {
        &self.base
    }
}

impl IrSensors {
    /// Raw reading of sensor `index` (0..=7); larger means closer
    pub fn read(&self, index: i64) -> Result<i32> {
        limits::check("ir sensor", index, IR_SENSOR)?;
        self.base
            .query(&CommandLine::new(Verb::ReadIR).arg(index), 1)
    }

    /// Raw reading of `sensor`
    pub fn read_sensor(&self, sensor: IrSensor) -> Result<i32> {
        self.read(sensor.index())
    }

    /// Every sensor in index order
    pub fn read_all(&self) -> Result<[i32; 8]> {
        let mut values = [0; 8];
        for (value, sensor) in values.iter_mut().zip(IrSensor::ALL) {
            *value = self.read_sensor(sensor)?;
        }
        Ok(values)
    }
}
