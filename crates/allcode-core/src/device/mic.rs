//! Microphone

use super::{Device, DeviceBase};
use crate::error::Result;
use crate::protocol::{CommandLine, Verb};

/// Microphone level
pub struct Mic {
    base: DeviceBase,
}

impl Device for Mic {
    fn from_base(base: DeviceBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &DeviceBase {
        &self.base
    }
}

impl Mic {
    /// Current sound level
    pub fn read(&self) -> Result<i32> {
        self.base.query(&CommandLine::new(Verb::ReadMic), 1)
    }
}
