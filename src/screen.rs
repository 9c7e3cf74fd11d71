//! Two-line text screen on top of a [`DisplaySink`]

use crate::device::DisplaySink;

pub const DISPLAY_COLUMNS: usize = 16;
pub const DISPLAY_ROWS: usize = 2;

// Messages
pub(crate) const MSG_SPLASH_TITLE: &str = "Access Control";
pub(crate) const MSG_SPLASH_STARTING: &str = "Starting...";
pub(crate) const MSG_CONNECTING: &str = "Connecting to";
pub(crate) const MSG_CONNECTED: &str = "Connected!";
pub(crate) const MSG_LINK_FAILED: &str = "Link failed";
pub(crate) const MSG_CHECK_NETWORK: &str = "Check network";
pub(crate) const MSG_CLOCK_SYNCED: &str = "Clock synced";
pub(crate) const MSG_CLOCK_NOT_SYNCED: &str = "Clock not synced";
pub(crate) const MSG_TAG_READ: &str = "Tag read";
pub(crate) const MSG_GRANTED: &str = "Access Granted";
pub(crate) const MSG_DENIED: &str = "Access Denied";
pub(crate) const MSG_CONNECTION_ERROR: &str = "Connection Error";
pub(crate) const MSG_DISCONNECTED: &str = "Disconnected";
pub(crate) const MSG_PRESENT_CARD: &str = "Present card";
pub(crate) const MSG_TIME_ERROR: &str = "Time error";

/// Text currently visible on the display, one entry per row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    lines: [String; DISPLAY_ROWS],
}

impl DisplayState {
    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map(String::as_str).unwrap_or("")
    }

    /// Visible text of `row` with trailing padding removed
    pub fn trimmed(&self, row: usize) -> &str {
        self.line(row).trim_end()
    }

    fn write_at(&mut self, col: usize, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        let mut chars: Vec<char> = line.chars().collect();
        if chars.len() < col {
            chars.resize(col, ' ');
        }
        for (i, c) in text.chars().enumerate() {
            let pos = col + i;
            if pos >= DISPLAY_COLUMNS {
                break;
            }
            if pos < chars.len() {
                chars[pos] = c;
            } else {
                chars.push(c);
            }
        }
        *line = chars.into_iter().collect();
    }
}

/// Owns the display sink and mirrors what it shows
pub struct Screen<D: DisplaySink> {
    sink: D,
    state: DisplayState,
}

impl<D: DisplaySink> Screen<D> {
    pub fn new(sink: D) -> Self {
        Self {
            sink,
            state: DisplayState::default(),
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }

    /// Replace both lines
    pub fn render(&mut self, top: &str, bottom: &str) {
        self.sink.clear();
        self.state = DisplayState::default();
        self.write_at(0, 0, &fit(top));
        self.write_at(0, 1, &fit(bottom));
    }

    /// Rewrite a single row across the full width, leaving the other row alone
    pub fn render_line(&mut self, row: usize, text: &str) {
        self.write_at(0, row, &pad(text));
    }

    /// Write at an arbitrary position without touching the rest of the screen
    pub fn write_at(&mut self, col: usize, row: usize, text: &str) {
        self.sink.set_cursor(col as u8, row as u8);
        self.sink.print(text);
        self.state.write_at(col, row, text);
    }
}

/// Truncate to the display width
pub(crate) fn fit(text: &str) -> String {
    text.chars().take(DISPLAY_COLUMNS).collect()
}

/// Truncate or space-pad to exactly the display width
pub(crate) fn pad(text: &str) -> String {
    format!("{:<width$}", fit(text), width = DISPLAY_COLUMNS)
}
