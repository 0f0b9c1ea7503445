//! Symbolic names for device indices
//!
//! Each enum maps to the integer the firmware expects; the device methods also
//! accept the raw integer.

use serde::{Deserialize, Serialize};

/// Accelerometer axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Left to right
    X,
    /// Back to front
    Y,
    /// Vertical
    Z,
}

impl Axis {
    /// Every axis in firmware order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Integer the firmware expects
    pub fn index(self) -> i64 {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Push button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    /// Left button
    Left,
    /// Right button
    Right,
}

impl Button {
    /// Integer the firmware expects
    pub fn index(self) -> i64 {
        match self {
            Button::Left => 0,
            Button::Right => 1,
        }
    }
}

/// Downward-facing line sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineSensor {
    /// Left sensor
    Left,
    /// Right sensor
    Right,
}

impl LineSensor {
    /// Integer the firmware expects
    pub fn index(self) -> i64 {
        match self {
            LineSensor::Left => 0,
            LineSensor::Right => 1,
        }
    }
}

/// IR distance sensors, clockwise from the left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrSensor {
    /// Sensor 0
    Left,
    /// Sensor 1
    FrontLeft,
    /// Sensor 2
    Front,
    /// Sensor 3
    FrontRight,
    /// Sensor 4
    Right,
    /// Sensor 5
    BackRight,
    /// Sensor 6
    Back,
    /// Sensor 7
    BackLeft,
}

impl IrSensor {
    /// Every sensor in firmware order
    pub const ALL: [IrSensor; 8] = [
        IrSensor::Left,
        IrSensor::FrontLeft,
        IrSensor::Front,
        IrSensor::FrontRight,
        IrSensor::Right,
        IrSensor::BackRight,
        IrSensor::Back,
        IrSensor::BackLeft,
    ];

    /// Integer the firmware expects
    pub fn index(self) -> i64 {
        self as i64
    }
}

/// Servo channel, numbered from 1 as on the robot's header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServoId {
    /// Channel 1
    Servo1,
    /// Channel 2
    Servo2,
    /// Channel 3
    Servo3,
    /// Channel 4
    Servo4,
}

impl ServoId {
    /// Integer the firmware expects
    pub fn index(self) -> i64 {
        match self {
            ServoId::Servo1 => 1,
            ServoId::Servo2 => 2,
            ServoId::Servo3 => 3,
            ServoId::Servo4 => 4,
        }
    }
}

/// LCD colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Colour {
    /// Index 0
    White,
    /// Index 1
    Black,
}

impl Colour {
    /// Integer the firmware expects
    pub fn index(self) -> i64 {
        match self {
            Colour::White => 0,
            Colour::Black => 1,
        }
    }
}

/// Recording bit depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitDepth {
    /// 8-bit samples
    Bits8,
    /// 16-bit samples
    Bits16,
}

impl BitDepth {
    /// Integer the firmware expects
    pub fn index(self) -> i64 {
        match self {
            BitDepth::Bits8 => 0,
            BitDepth::Bits16 => 1,
        }
    }
}

/// Recording sample rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleRate {
    /// 8 kHz
    Khz8,
    /// 16 kHz
    Khz16,
}

impl SampleRate {
    /// Integer the firmware expects
    pub fn index(self) -> i64 {
        match self {
            SampleRate::Khz8 => 0,
            SampleRate::Khz16 => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ir_sensor_indices() {
        let indices: Vec<i64> = IrSensor::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(indices, (0..8).collect::<Vec<i64>>());
    }

    #[test]
    fn test_servo_ids_start_at_one() {
        assert_eq!(ServoId::Servo1.index(), 1);
        assert_eq!(ServoId::Servo4.index(), 4);
    }
}
