//! SD card slot
//!
//! File operations answer with a status integer; recording and playback can
//! take a while, so their reply budgets scale with the work.

use super::{Device, DeviceBase};
use crate::error::Result;
use crate::limits::{self, BIT_DEPTH, LCD_X, LCD_Y, RECORD_SECONDS, SAMPLE_RATE, SD_BYTE};
use crate::protocol::{CommandLine, Verb};
use crate::types::{BitDepth, SampleRate};

/// Reply budget for file and byte operations
const FILE_ATTEMPTS: u32 = 2;

/// Reply budget for playback when none is given
pub const DEFAULT_PLAYBACK_ATTEMPTS: u32 = 50;

/// Reply budget for drawing a bitmap
const BITMAP_ATTEMPTS: u32 = 5;

/// Extra reply attempts allowed past the recording length
const RECORD_GRACE: u32 = 5;

/// Files, recording and playback on the SD card
pub struct SdCard {
    base: DeviceBase,
}

impl Device for SdCard {
    fn from_base(base: DeviceBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &DeviceBase {
        &self.base
    }
}

impl SdCard {
    /// Initialise the card, returning its status
    pub fn init(&self) -> Result<i32> {
        self.base
            .query(&CommandLine::new(Verb::CardInit), FILE_ATTEMPTS)
    }

    /// Create `filename`
    pub fn create_file(&self, filename: &str) -> Result<i32> {
        self.file_op(Verb::CardCreate, filename)
    }

    /// Open `filename` for byte access
    pub fn open_file(&self, filename: &str) -> Result<i32> {
        self.file_op(Verb::CardOpen, filename)
    }

    /// Delete `filename`
    pub fn delete_file(&self, filename: &str) -> Result<i32> {
        self.file_op(Verb::CardDelete, filename)
    }

    /// Append one byte to the open file
    pub fn write_byte(&self, data: i64) -> Result<()> {
        limits::check("byte", data, SD_BYTE)?;
        self.base
            .command(&CommandLine::new(Verb::CardWriteByte).arg(data))
    }

    /// Next byte of the open file
    pub fn read_byte(&self) -> Result<i32> {
        self.base
            .query(&CommandLine::new(Verb::CardReadByte), FILE_ATTEMPTS)
    }

    /// Record the microphone to `filename`.
    ///
    /// The reply budget defaults to `seconds + 5` attempts.
    pub fn record_mic(
        &self,
        bit_depth: i64,
        sample_rate: i64,
        seconds: i64,
        filename: &str,
        attempts: Option<u32>,
    ) -> Result<i32> {
        limits::check("bit depth", bit_depth, BIT_DEPTH)?;
        limits::check("sample rate", sample_rate, SAMPLE_RATE)?;
        limits::check("seconds", seconds, RECORD_SECONDS)?;
        let command = CommandLine::new(Verb::CardRecordMic)
            .arg(bit_depth)
            .arg(sample_rate)
            .arg(seconds)
            .filename(filename)?;
        let attempts = attempts.unwrap_or(seconds as u32 + RECORD_GRACE);
        self.base.query(&command, attempts)
    }

    /// [`SdCard::record_mic`] with symbolic settings and the default budget
    pub fn record(
        &self,
        bit_depth: BitDepth,
        sample_rate: SampleRate,
        seconds: i64,
        filename: &str,
    ) -> Result<i32> {
        self.record_mic(bit_depth.index(), sample_rate.index(), seconds, filename, None)
    }

    /// Play `filename`, waiting up to `attempts` reply lines (default 50)
    pub fn playback(&self, filename: &str, attempts: Option<u32>) -> Result<i32> {
        let command = CommandLine::new(Verb::CardPlayback).filename(filename)?;
        self.base
            .query(&command, attempts.unwrap_or(DEFAULT_PLAYBACK_ATTEMPTS))
    }

    /// Draw a bitmap file on the LCD at (x, y).
    ///
    /// The name is sent quoted, so it may contain spaces.
    pub fn bitmap(&self, x: i64, y: i64, filename: &str) -> Result<i32> {
        limits::check("x", x, LCD_X)?;
        limits::check("y", y, LCD_Y)?;
        let command = CommandLine::new(Verb::CardBitmap)
            .arg(x)
            .arg(y)
            .quoted_filename(filename)?;
        self.base.query(&command, BITMAP_ATTEMPTS)
    }

    fn file_op(&self, verb: Verb, filename: &str) -> Result<i32> {
        let command = CommandLine::new(verb).filename(filename)?;
        self.base.query(&command, FILE_ATTEMPTS)
    }
}
