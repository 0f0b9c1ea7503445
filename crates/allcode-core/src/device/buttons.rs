//! Push buttons

use super::{Device, DeviceBase};
use crate::error::Result;
use crate::limits::{self, BUTTON};
use crate::protocol::{CommandLine, Verb};
use crate::types::Button;

/// The two push buttons
pub struct PushButtons {
    base: DeviceBase,
}

impl Device for PushButtons {
    fn from_base(base: DeviceBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &DeviceBase {
        &self.base
    }
}

impl PushButtons {
    /// True only when the firmware reports the button as pressed (1)
    pub fn read(&self, index: i64) -> Result<bool> {
        limits::check("button", index, BUTTON)?;
        let value = self
            .base
            .query(&CommandLine::new(Verb::ReadSwitch).arg(index), 1)?;
        Ok(value == 1)
    }

    /// Whether `button` is held down
    pub fn is_pressed(&self, button: Button) -> Result<bool> {
        self.read(button.index())
    }
}
