//! The eight LEDs on the top of the robot

use super::{Device, DeviceBase};
use crate::error::Result;
use crate::limits::{self, LED_BYTE, LED_INDEX};
use crate::protocol::{CommandLine, Verb};

/// Drives the LED bar
pub struct Leds {
    base: DeviceBase,
}

impl Device for Leds {
    fn from_base(base: DeviceBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &DeviceBase {
        &self.base
    }
}

impl Leds {
    /// Set all eight LEDs at once, one bit per LED
    pub fn write(&self, value: i64) -> Result<()> {
        limits::check("led value", value, LED_BYTE)?;
        self.base
            .command(&CommandLine::new(Verb::LEDWrite).arg(value))
    }

    /// Turn LED `index` on
    pub fn on(&self, index: i64) -> Result<()> {
        limits::check("led index", index, LED_INDEX)?;
        self.base.command(&CommandLine::new(Verb::LEDOn).arg(index))
    }

    /// Turn LED `index` off
    pub fn off(&self, index: i64) -> Result<()> {
        limits::check("led index", index, LED_INDEX)?;
        self.base.command(&CommandLine::new(Verb::LEDOff).arg(index))
    }
}
