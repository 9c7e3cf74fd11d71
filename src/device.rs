//! Local peripherals polled by the terminal

use std::time::{Duration, Instant};

use chrono::NaiveTime;

use crate::types::CardUid;

/// Proximity card reader (MFRC522 or similar)
pub trait CardReader {
    /// Whether a card that has not been halted yet is in the field
    fn is_new_card_present(&mut self) -> bool;

    /// Read the UID of the card detected by [`is_new_card_present`](Self::is_new_card_present)
    fn read_card_serial(&mut self) -> Option<CardUid>;

    /// Halt the card and stop the crypto session so the next card can be detected
    fn halt(&mut self);
}

/// Character display addressed by column and row
pub trait DisplaySink {
    fn clear(&mut self);

    fn set_cursor(&mut self, col: u8, row: u8);

    /// Write text at the cursor. Text past the last column is dropped by the device.
    fn print(&mut self, text: &str);
}

/// Wall-clock source, synchronized once at startup
pub trait ClockSource {
    type Error: std::fmt::Debug;

    /// Start synchronizing against `ntp_server` with the given offsets
    fn configure(
        &mut self,
        ntp_server: &str,
        utc_offset_secs: i32,
        dst_offset_secs: i32,
    ) -> Result<(), Self::Error>;

    /// Current local time, or an error while not synchronized
    fn local_time(&mut self) -> Result<NaiveTime, Self::Error>;
}

/// Monotonic millisecond time plus blocking delays
pub trait Timebase {
    fn now_ms(&self) -> u64;

    fn delay_ms(&mut self, ms: u64);
}

/// [`Timebase`] backed by `std::time`
pub struct StdTimebase {
    origin: Instant,
}

impl StdTimebase {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdTimebase {
    fn default() -> Self {
        Self::new()
    }
}

impl Timebase for StdTimebase {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn delay_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}
