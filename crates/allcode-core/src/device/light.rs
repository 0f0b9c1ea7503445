//! Ambient light sensor

use super::{Device, DeviceBase};
use crate::error::Result;
use crate::protocol::{CommandLine, Verb};

/// Ambient light sensor
pub struct LightSensor {
    base: DeviceBase,
}

impl Device for LightSensor {
    fn from_base(base: DeviceBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &DeviceBase {
        &self.base
    }
}

impl LightSensor {
    /// Raw light level
    pub fn read(&self) -> Result<i32> {
        self.base.query(&CommandLine::new(Verb::ReadLight), 1)
    }
}
