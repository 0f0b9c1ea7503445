//! Servo header

use super::{Device, DeviceBase};
use crate::error::Result;
use crate::limits::{self, SERVO_INDEX, SERVO_POSITION, SERVO_SPEED};
use crate::protocol::{CommandLine, Verb};
use crate::types::ServoId;

/// Up to four hobby servos
pub struct Servos {
    base: DeviceBase,
}

impl Device for Servos {
    fn from_base(base: DeviceBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &DeviceBase {
        &self.base
    }
}

impl Servos {
    /// Power servo `index`
    pub fn enable(&self, index: i64) -> Result<()> {
        limits::check("servo", index, SERVO_INDEX)?;
        self.base
            .command(&CommandLine::new(Verb::ServoEnable).arg(index))
    }

    /// Release servo `index`
    pub fn disable(&self, index: i64) -> Result<()> {
        limits::check("servo", index, SERVO_INDEX)?;
        self.base
            .command(&CommandLine::new(Verb::ServoDisable).arg(index))
    }

    /// Jump straight to `position`
    pub fn set_pos(&self, index: i64, position: i64) -> Result<()> {
        self.positioned(Verb::ServoSetPos, index, position)
    }

    /// Move to `position` at the speed set by [`Servos::move_speed`]
    pub fn auto_move(&self, index: i64, position: i64) -> Result<()> {
        self.positioned(Verb::ServoAutoMove, index, position)
    }

    /// Speed used by [`Servos::auto_move`]
    pub fn move_speed(&self, speed: i64) -> Result<()> {
        limits::check("servo speed", speed, SERVO_SPEED)?;
        self.base
            .command(&CommandLine::new(Verb::ServoMoveSpeed).arg(speed))
    }

    /// Power `servo`
    pub fn enable_servo(&self, servo: ServoId) -> Result<()> {
        self.enable(servo.index())
    }

    /// Release `servo`
    pub fn disable_servo(&self, servo: ServoId) -> Result<()> {
        self.disable(servo.index())
    }

    fn positioned(&self, verb: Verb, index: i64, position: i64) -> Result<()> {
        limits::check("servo", index, SERVO_INDEX)?;
        limits::check("servo position", position, SERVO_POSITION)?;
        self.base
            .command(&CommandLine::new(verb).arg(index).arg(position))
    }
}
