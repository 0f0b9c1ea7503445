//! Three-axis accelerometer

use super::{Device, DeviceBase};
use crate::error::Result;
use crate::limits::{self, AXIS};
use crate::protocol::{CommandLine, Verb};
use crate::types::Axis;

/// Reads the accelerometer axes
pub struct Accelerometer {
    base: DeviceBase,
}

impl Device for Accelerometer {
    fn from_base(base: DeviceBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &DeviceBase {
        &self.base
    }
}

impl Accelerometer {
    /// Raw reading for axis `index` (0 = X, 1 = Y, 2 = Z)
    pub fn read_axis(&self, index: i64) -> Result<i32> {
        limits::check("axis", index, AXIS)?;
        self.base
            .query(&CommandLine::new(Verb::ReadAxis).arg(index), 1)
    }

    /// Raw reading for `axis`
    pub fn read(&self, axis: Axis) -> Result<i32> {
        self.read_axis(axis.index())
    }

    /// X axis reading
    pub fn x(&self) -> Result<i32> {
        self.read(Axis::X)
    }

    /// Y axis reading
    pub fn y(&self) -> Result<i32> {
        self.read(Axis::Y)
    }

    /// Z axis reading
    pub fn z(&self) -> Result<i32> {
        self.read(Axis::Z)
    }
}
