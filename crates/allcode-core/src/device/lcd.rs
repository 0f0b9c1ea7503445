//! Monochrome 128x32 LCD
//!
//! Every drawing command is fire-and-forget. Coordinates are pixels from the
//! top-left corner.

use super::{Device, DeviceBase};
use crate::error::Result;
use crate::limits::{self, COLOUR, LCD_FLAG, LCD_X, LCD_Y};
use crate::protocol::{CommandLine, Verb};
use crate::types::Colour;

/// The 128x32 monochrome display
pub struct Lcd {
    base: DeviceBase,
}

impl Device for Lcd {
    fn from_base(base: DeviceBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &DeviceBase {
        &self.base
    }
}

fn check_point(x: i64, y: i64) -> Result<()> {
    limits::check("x", x, LCD_X)?;
    limits::check("y", y, LCD_Y)
}

impl Lcd {
    /// Blank the display
    pub fn clear(&self) -> Result<()> {
        self.base.command(&CommandLine::new(Verb::LCDClear))
    }

    /// Draw `text` starting at (x, y)
    pub fn print(&self, x: i64, y: i64, text: &str) -> Result<()> {
        check_point(x, y)?;
        let command = CommandLine::new(Verb::LCDPrint)
            .arg(x)
            .arg(y)
            .text("text", text)?;
        self.base.command(&command)
    }

    /// Print `value` at (x, y)
    pub fn number(&self, x: i64, y: i64, value: i64) -> Result<()> {
        check_point(x, y)?;
        self.base
            .command(&CommandLine::new(Verb::LCDNumber).arg(x).arg(y).arg(value))
    }

    /// Set (1) or clear (0) one pixel
    pub fn pixel(&self, x: i64, y: i64, state: i64) -> Result<()> {
        check_point(x, y)?;
        limits::check("pixel state", state, LCD_FLAG)?;
        self.base
            .command(&CommandLine::new(Verb::LCDPixel).arg(x).arg(y).arg(state))
    }

    /// Draw a line between two points
    pub fn line(&self, x1: i64, y1: i64, x2: i64, y2: i64) -> Result<()> {
        check_point(x1, y1)?;
        check_point(x2, y2)?;
        self.base.command(
            &CommandLine::new(Verb::LCDLine)
                .arg(x1)
                .arg(y1)
                .arg(x2)
                .arg(y2),
        )
    }

    /// Draw a rectangle from two corners
    pub fn rect(&self, x1: i64, y1: i64, x2: i64, y2: i64) -> Result<()> {
        check_point(x1, y1)?;
        check_point(x2, y2)?;
        self.base.command(
            &CommandLine::new(Verb::LCDRect)
                .arg(x1)
                .arg(y1)
                .arg(x2)
                .arg(y2),
        )
    }

    /// Switch the backlight off (0) or on (1)
    pub fn backlight(&self, value: i64) -> Result<()> {
        limits::check("backlight", value, LCD_FLAG)?;
        self.base
            .command(&CommandLine::new(Verb::LCDBacklight).arg(value))
    }

    /// Foreground and background colour plus text transparency
    pub fn options(&self, foreground: i64, background: i64, transparent: i64) -> Result<()> {
        limits::check("foreground", foreground, COLOUR)?;
        limits::check("background", background, COLOUR)?;
        limits::check("transparent", transparent, LCD_FLAG)?;
        self.base.command(
            &CommandLine::new(Verb::LCDOptions)
                .arg(foreground)
                .arg(background)
                .arg(transparent),
        )
    }

    /// [`Lcd::options`] with symbolic colours
    pub fn colours(&self, foreground: Colour, background: Colour, transparent: bool) -> Result<()> {
        self.options(foreground.index(), background.index(), transparent as i64)
    }

    /// Firmware status output on the LCD
    pub fn verbose(&self, value: i64) -> Result<()> {
        self.base
            .command(&CommandLine::new(Verb::LCDVerbose).arg(value))
    }
}
