//! Protocol commands
//!
//! Defines the text verbs understood by the AllCode firmware and a small builder
//! that formats a verb and its arguments into one command line.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, RobotError};

/// Command verbs understood by the robot firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verb {
    /// Firmware API version
    GetAPIVersion,
    /// Battery level in millivolts
    GetBatteryVoltage,
    /// Drive forwards a distance in mm
    Forwards,
    /// Drive backwards a distance in mm
    Backwards,
    /// Turn left by an angle in degrees
    Left,
    /// Turn right by an angle in degrees
    Right,
    /// Set both motor speeds
    SetMotors,
    /// Read one accelerometer axis
    ReadAxis,
    /// Read one push button
    ReadSwitch,
    /// Read one IR sensor
    ReadIR,
    /// Read the light sensor
    ReadLight,
    /// Read one line sensor
    ReadLine,
    /// Read the microphone level
    ReadMic,
    /// Set all LEDs from a bit pattern
    LEDWrite,
    /// Turn one LED on
    LEDOn,
    /// Turn one LED off
    LEDOff,
    /// Clear the LCD
    LCDClear,
    /// Print text on the LCD
    LCDPrint,
    /// Print a number on the LCD
    LCDNumber,
    /// Set one LCD pixel
    LCDPixel,
    /// Draw a line on the LCD
    LCDLine,
    /// Draw a rectangle on the LCD
    LCDRect,
    /// Switch the LCD backlight
    LCDBacklight,
    /// Set LCD colours and transparency
    LCDOptions,
    /// Set firmware status output on the LCD
    LCDVerbose,
    /// Initialise the SD card
    CardInit,
    /// Create a file
    CardCreate,
    /// Open a file
    CardOpen,
    /// Delete a file
    CardDelete,
    /// Append a byte to the open file
    CardWriteByte,
    /// Read the next byte of the open file
    CardReadByte,
    /// Record the microphone to a file
    CardRecordMic,
    /// Play a sound file
    CardPlayback,
    /// Draw a bitmap file on the LCD
    CardBitmap,
    /// Enable one servo
    ServoEnable,
    /// Disable one servo
    ServoDisable,
    /// Move one servo immediately
    ServoSetPos,
    /// Move one servo at the auto-move speed
    ServoAutoMove,
    /// Set the auto-move speed
    ServoMoveSpeed,
    /// Play a note on the speaker
    PlayNote,
}

impl Verb {
    /// Every verb, in wire-table order
    pub const ALL: [Verb; 40] = [
        Verb::GetAPIVersion,
        Verb::GetBatteryVoltage,
        Verb::Forwards,
        Verb::Backwards,
        Verb::Left,
        Verb::Right,
        Verb::SetMotors,
        Verb::ReadAxis,
        Verb::ReadSwitch,
        Verb::ReadIR,
        Verb::ReadLight,
        Verb::ReadLine,
        Verb::ReadMic,
        Verb::LEDWrite,
        Verb::LEDOn,
        Verb::LEDOff,
        Verb::LCDClear,
        Verb::LCDPrint,
        Verb::LCDNumber,
        Verb::LCDPixel,
        Verb::LCDLine,
        Verb::LCDRect,
        Verb::LCDBacklight,
        Verb::LCDOptions,
        Verb::LCDVerbose,
        Verb::CardInit,
        Verb::CardCreate,
        Verb::CardOpen,
        Verb::CardDelete,
        Verb::CardWriteByte,
        Verb::CardReadByte,
        Verb::CardRecordMic,
        Verb::CardPlayback,
        Verb::CardBitmap,
        Verb::ServoEnable,
        Verb::ServoDisable,
        Verb::ServoSetPos,
        Verb::ServoAutoMove,
        Verb::ServoMoveSpeed,
        Verb::PlayNote,
    ];

    /// The verb as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::GetAPIVersion => "GetAPIVersion",
            Verb::GetBatteryVoltage => "GetBatteryVoltage",
            Verb::Forwards => "Forwards",
            Verb::Backwards => "Backwards",
            Verb::Left => "Left",
            Verb::Right => "Right",
            Verb::SetMotors => "SetMotors",
            Verb::ReadAxis => "ReadAxis",
            Verb::ReadSwitch => "ReadSwitch",
            Verb::ReadIR => "ReadIR",
            Verb::ReadLight => "ReadLight",
            Verb::ReadLine => "ReadLine",
            Verb::ReadMic => "ReadMic",
            Verb::LEDWrite => "LEDWrite",
            Verb::LEDOn => "LEDOn",
            Verb::LEDOff => "LEDOff",
            Verb::LCDClear => "LCDClear",
            Verb::LCDPrint => "LCDPrint",
            Verb::LCDNumber => "LCDNumber",
            Verb::LCDPixel => "LCDPixel",
            Verb::LCDLine => "LCDLine",
            Verb::LCDRect => "LCDRect",
            Verb::LCDBacklight => "LCDBacklight",
            Verb::LCDOptions => "LCDOptions",
            Verb::LCDVerbose => "LCDVerbose",
            Verb::CardInit => "CardInit",
            Verb::CardCreate => "CardCreate",
            Verb::CardOpen => "CardOpen",
            Verb::CardDelete => "CardDelete",
            Verb::CardWriteByte => "CardWriteByte",
            Verb::CardReadByte => "CardReadByte",
            Verb::CardRecordMic => "CardRecordMic",
            Verb::CardPlayback => "CardPlayback",
            Verb::CardBitmap => "CardBitmap",
            Verb::ServoEnable => "ServoEnable",
            Verb::ServoDisable => "ServoDisable",
            Verb::ServoSetPos => "ServoSetPos",
            Verb::ServoAutoMove => "ServoAutoMove",
            Verb::ServoMoveSpeed => "ServoMoveSpeed",
            Verb::PlayNote => "PlayNote",
        }
    }

    /// Look up a verb by its wire name
    pub fn parse(name: &str) -> Option<Verb> {
        Verb::ALL.iter().copied().find(|v| v.as_str() == name)
    }

    /// Check if the firmware answers this verb with an integer line.
    ///
    /// Fire-and-forget verbs (LEDs, LCD drawing, servos, motors, notes) send nothing back.
    pub fn expects_response(&self) -> bool {
        !matches!(
            self,
            Verb::SetMotors
                | Verb::LEDWrite
                | Verb::LEDOn
                | Verb::LEDOff
                | Verb::LCDClear
                | Verb::LCDPrint
                | Verb::LCDNumber
                | Verb::LCDPixel
                | Verb::LCDLine
                | Verb::LCDRect
                | Verb::LCDBacklight
                | Verb::LCDOptions
                | Verb::LCDVerbose
                | Verb::CardWriteByte
                | Verb::ServoEnable
                | Verb::ServoDisable
                | Verb::ServoSetPos
                | Verb::ServoAutoMove
                | Verb::ServoMoveSpeed
                | Verb::PlayNote
        )
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One command line: a verb followed by space-separated arguments.
///
/// The trailing newline is added by the connection at send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    verb: Verb,
    text: String,
}

impl CommandLine {
    /// Start a line holding only `verb`
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            text: verb.as_str().to_string(),
        }
    }

    /// Append a numeric argument
    pub fn arg(mut self, value: i64) -> Self {
        self.text.push(' ');
        self.text.push_str(&value.to_string());
        self
    }

    /// Append free text (may contain spaces, never line breaks)
    pub fn text(mut self, name: &'static str, value: &str) -> Result<Self> {
        if value.contains(&['\n', '\r'][..]) {
            return Err(RobotError::InvalidArgument {
                name,
                reason: "must not contain line breaks".to_string(),
            });
        }
        self.text.push(' ');
        self.text.push_str(value);
        Ok(self)
    }

    /// Append a file name wrapped in double quotes, so it may contain spaces.
    ///
    /// Quote characters in `value` are removed first; the remaining name must
    /// be non-empty and free of line breaks.
    pub fn quoted_filename(mut self, value: &str) -> Result<Self> {
        let bare = value.replace('"', "");
        if bare.is_empty() {
            return Err(RobotError::InvalidArgument {
                name: "filename",
                reason: "must not be empty".to_string(),
            });
        }
        if bare.contains(&['\n', '\r'][..]) {
            return Err(RobotError::InvalidArgument {
                name: "filename",
                reason: "must not contain line breaks".to_string(),
            });
        }
        self.text.push_str(" \"");
        self.text.push_str(&bare);
        self.text.push('"');
        Ok(self)
    }

    /// Append a single-token file name
    pub fn filename(mut self, value: &str) -> Result<Self> {
        if value.is_empty() {
            return Err(RobotError::InvalidArgument {
                name: "filename",
                reason: "must not be empty".to_string(),
            });
        }
        if value.chars().any(char::is_whitespace) {
            return Err(RobotError::InvalidArgument {
                name: "filename",
                reason: "must not contain whitespace".to_string(),
            });
        }
        self.text.push(' ');
        self.text.push_str(value);
        Ok(self)
    }

    /// Verb this line starts with
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// The line without its newline terminator
    pub fn as_str(&self) -> &str {
        &self.text
    }

}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
