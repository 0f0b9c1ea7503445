//! Piezo speaker

use std::thread;
use std::time::Duration;

use super::{Device, DeviceBase};
use crate::error::Result;
use crate::limits::{self, NOTE_HZ, NOTE_LENGTH_MS};
use crate::protocol::{CommandLine, Verb};

/// Plays single notes on the piezo
pub struct Speaker {
    base: DeviceBase,
}

impl Device for Speaker {
    fn from_base(base: DeviceBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &DeviceBase {
        &self.base
    }
}

impl Speaker {
    /// Play `note` Hz for `length_ms`, blocking until the note has finished
    pub fn play_note(&self, note: i64, length_ms: i64) -> Result<()> {
        limits::check("note", note, NOTE_HZ)?;
        limits::check("note length", length_ms, NOTE_LENGTH_MS)?;
        self.base
            .command(&CommandLine::new(Verb::PlayNote).arg(note).arg(length_ms))?;
        thread::sleep(Duration::from_millis(length_ms as u64));
        Ok(())
    }
}
