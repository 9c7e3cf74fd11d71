//! Access-control terminal core: reads proximity card UIDs, reports them to an
//! authorization backend over HTTP and shows the decision plus a live clock on a
//! 16x2 character display.
//!
//! Every piece of hardware sits behind a trait so the loop runs the same on a
//! device and in tests.
//!
//! # Features
//!
//! - `esp32` - Wi-Fi, HTTP and SNTP backends for ESP32 using esp-idf-svc
//! - `serial` - Line-oriented USB card reader for desktop using serialport crate
//!
//! # Example
//!
//! ```ignore
//! use rfid_access_terminal::{AccessTerminal, StdTimebase, TerminalConfig};
//!
//! let config = TerminalConfig::default();
//! let mut terminal = AccessTerminal::new(&config, reader, lcd, wifi, clock, StdTimebase::new());
//! terminal.run()?;
//! ```

mod bootstrap;
mod config;
mod device;
mod protocol;
mod screen;
mod terminal;
mod transport;
mod types;

#[cfg(feature = "esp32")]
mod esp32;

#[cfg(feature = "serial")]
mod serial;

// Re-exports
pub use bootstrap::{establish_link, show_splash, synchronize_clock};
pub use config::{Backoff, REPORT_PATH, RetryPolicy, TerminalConfig, Timings};
pub use device::{CardReader, ClockSource, DisplaySink, StdTimebase, Timebase};
pub use protocol::{
    CONTENT_TYPE_JSON, IdentificationReport, build_report_payload, classify_response, parse_outcome,
};
pub use screen::{DISPLAY_COLUMNS, DISPLAY_ROWS, DisplayState, Screen};
pub use terminal::AccessTerminal;
pub use transport::NetworkTransport;
pub use types::{
    AuthorizationOutcome, CardUid, HttpResponse, LinkInfo, TerminalError, TransportErrorReason,
    hex_to_bytes,
};

#[cfg(feature = "esp32")]
pub use esp32::{EspSntpClock, EspWifiTransport};

#[cfg(feature = "serial")]
pub use serial::SerialCardReader;
