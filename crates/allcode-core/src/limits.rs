//! Argument ranges accepted by the firmware
//!
//! Every range is inclusive. Arguments are checked before anything is sent.

use std::ops::RangeInclusive;

use crate::error::{Result, RobotError};

/// Travel distance in millimetres
pub const DISTANCE_MM: RangeInclusive<i64> = 0..=1000;
/// Turn angle in degrees
pub const ANGLE_DEG: RangeInclusive<i64> = 0..=360;
/// Motor speed as a signed percentage
pub const MOTOR_SPEED: RangeInclusive<i64> = -100..=100;

/// LED number
pub const LED_INDEX: RangeInclusive<i64> = 0..=7;
/// LED bit pattern, bit 0 for LED 0
pub const LED_BYTE: RangeInclusive<i64> = 0..=255;

/// IR sensor number
pub const IR_SENSOR: RangeInclusive<i64> = 0..=7;
/// Accelerometer axis
pub const AXIS: RangeInclusive<i64> = 0..=2;
/// Push button
pub const BUTTON: RangeInclusive<i64> = 0..=1;
/// Line sensor
pub const LINE_SENSOR: RangeInclusive<i64> = 0..=1;

/// Servo channel
pub const SERVO_INDEX: RangeInclusive<i64> = 1..=4;
/// Servo position
pub const SERVO_POSITION: RangeInclusive<i64> = 0..=255;
/// Servo auto-move speed
pub const SERVO_SPEED: RangeInclusive<i64> = 0..=255;

/// LCD column in pixels
pub const LCD_X: RangeInclusive<i64> = 0..=127;
/// LCD row in pixels
pub const LCD_Y: RangeInclusive<i64> = 0..=31;
/// Pixel state, backlight and transparency flags
pub const LCD_FLAG: RangeInclusive<i64> = 0..=1;
/// LCD colour index
pub const COLOUR: RangeInclusive<i64> = 0..=1;

/// Byte written to the SD card
pub const SD_BYTE: RangeInclusive<i64> = 0..=255;
/// Recording length in seconds
pub const RECORD_SECONDS: RangeInclusive<i64> = 0..=65535;
/// Recording bit depth index
pub const BIT_DEPTH: RangeInclusive<i64> = 0..=1;
/// Recording sample rate index
pub const SAMPLE_RATE: RangeInclusive<i64> = 0..=1;

/// Note frequency in hertz
pub const NOTE_HZ: RangeInclusive<i64> = 0..=20000;
/// Note length in milliseconds
pub const NOTE_LENGTH_MS: RangeInclusive<i64> = 0..=65535;

/// Fail with [`RobotError::OutOfRange`] unless `value` lies in `range`
pub fn check(name: &'static str, value: i64, range: RangeInclusive<i64>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(RobotError::OutOfRange {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
