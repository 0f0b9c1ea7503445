//! Library errors

use thiserror::Error;

/// Errors raised by the robot client.
///
/// A missing or malformed reply is never an error: it degrades to
/// [`NO_RESPONSE`](crate::protocol::NO_RESPONSE) instead.
#[derive(Error, Debug)]
pub enum RobotError {
    /// A port number was given on a platform with no number mapping
    #[error("Unsupported platform for index-based port: {0}")]
    UnsupportedPlatform(String),

    /// The serial device could not be opened
    #[error("Failed to open port {port}: {reason}")]
    OpenFailed {
        /// Address that was tried
        port: String,
        /// Error text from the serial layer
        reason: String,
    },

    /// I/O was attempted on a closed transport
    #[error("Transport is not open")]
    NotOpen,

    /// A numeric argument fell outside its accepted range
    #[error("Invalid {name} {value}: must be in the range {min} to {max}")]
    OutOfRange {
        /// Argument name
        name: &'static str,
        /// Value given
        value: i64,
        /// Smallest accepted value
        min: i64,
        /// Largest accepted value
        max: i64,
    },

    /// A text or file name argument cannot be sent as given
    #[error("Invalid {name}: {reason}")]
    InvalidArgument {
        /// Argument name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Autodetect probed every candidate without an answer
    #[error("No responsive robot port found")]
    NoRobotFound,

    /// A config value is unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the serial port driver
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Error reading or writing the device or a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed config file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RobotError {
    /// True for errors caused by bad caller arguments, raised before any I/O.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            RobotError::OutOfRange { .. } | RobotError::InvalidArgument { .. }
        )
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, RobotError>;
