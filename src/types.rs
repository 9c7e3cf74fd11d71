//! Types shared by the terminal, the codec and the backends

use std::fmt;

/// UID bytes read from a proximity card during one scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardUid(Vec<u8>);

impl CardUid {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Uppercase, zero-padded, separator-free hex rendering
    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }
}

impl From<&[u8]> for CardUid {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// Why a report never got an answer from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorReason {
    /// The link was down at scan time, no request was issued
    NotConnected,
    /// The request was issued but no HTTP response came back
    NoResponse,
}

/// Decision rendered for a single scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    Granted {
        holder_name: String,
        /// Movement type reported by the backend ("entrada"/"salida"), not rendered
        movement: String,
    },
    Denied {
        status_code: u16,
    },
    TransportError {
        reason: TransportErrorReason,
    },
}

/// Raw HTTP answer returned by a [`NetworkTransport`](crate::NetworkTransport)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Result of a successful link bring-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    /// Address reported by the network stack, if it exposes one
    pub address: Option<String>,
    /// Number of connectivity checks it took
    pub attempts: u32,
}

/// Errors that can occur while running the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalError {
    /// No network at report time
    LinkUnavailable,
    /// The POST did not produce a response
    TransportFailure(String),
    /// Backend answered with a non-200 status
    AuthorizationDenied(u16),
    /// Wall clock not synchronized or unreadable
    ClockUnavailable(String),
    /// A 200 body lacked the expected fields or was not JSON
    MalformedResponse(String),
    /// Link establishment exhausted its retry policy
    StartupFailed { attempts: u32 },
}

impl fmt::Display for TerminalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkUnavailable => write!(f, "network link unavailable"),
            Self::TransportFailure(e) => write!(f, "transport failure: {}", e),
            Self::AuthorizationDenied(code) => write!(f, "authorization denied with status {}", code),
            Self::ClockUnavailable(e) => write!(f, "clock unavailable: {}", e),
            Self::MalformedResponse(e) => write!(f, "malformed response: {}", e),
            Self::StartupFailed { attempts } => {
                write!(f, "link not established after {} attempts", attempts)
            }
        }
    }
}

impl std::error::Error for TerminalError {}

/// Convert bytes to uppercase hex string
pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Parse a separator-free hex string back into bytes
///
/// Accepts either case. Returns `None` on odd length or non-hex input.
pub fn hex_to_bytes(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.trim();
    if hex.is_empty() || hex.len() % 2 != 0 || !hex.is_ascii() {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}
