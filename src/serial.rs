//! Serial port card reader for desktop using serialport crate
//!
//! Many USB proximity readers enumerate as a serial port and print one hex
//! UID per line while a card is in the field.

use log::{debug, warn};
use std::io::Read;
use std::time::Duration;

use crate::device::CardReader;
use crate::types::{CardUid, hex_to_bytes};

pub struct SerialCardReader {
    port: Box<dyn serialport::SerialPort>,
    line: Vec<u8>,
    pending: Option<CardUid>,
}

impl SerialCardReader {
    pub fn new(port_name: &str, baud_rate: u32) -> Result<Self, serialport::Error> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(Duration::from_millis(10))
            .open()?;
        std::thread::sleep(Duration::from_millis(500));
        port.clear(serialport::ClearBuffer::Input)?;

        Ok(Self {
            port,
            line: Vec::new(),
            pending: None,
        })
    }

    fn drain_input(&mut self) -> std::io::Result<()> {
        let available = self.port.bytes_to_read().map_err(std::io::Error::other)? as usize;
        if available == 0 {
            return Ok(());
        }
        let mut buf = vec![0u8; available];
        let read = self.port.read(&mut buf)?;
        for &b in &buf[..read] {
            match b {
                b'\r' | b'\n' => self.take_line(),
                _ => self.line.push(b),
            }
        }
        Ok(())
    }

    fn take_line(&mut self) {
        if self.line.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.line).into_owned();
        self.line.clear();
        match hex_to_bytes(&text) {
            Some(bytes) => {
                debug!("Serial reader line: {}", text);
                self.pending = Some(CardUid::new(bytes));
            }
            None => warn!("Ignoring non-hex reader line: {:?}", text),
        }
    }
}

impl CardReader for SerialCardReader {
    fn is_new_card_present(&mut self) -> bool {
        if self.pending.is_none() {
            if let Err(e) = self.drain_input() {
                warn!("Serial read error: {:?}", e);
            }
        }
        self.pending.is_some()
    }

    fn read_card_serial(&mut self) -> Option<CardUid> {
        self.pending.take()
    }

    fn halt(&mut self) {
        // Repeats of the card just handled were queued while the report ran
        self.line.clear();
        self.pending = None;
        if let Err(e) = self.port.clear(serialport::ClearBuffer::Input) {
            warn!("Failed to clear serial input: {:?}", e);
        }
    }
}
