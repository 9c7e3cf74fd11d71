use std::time::Duration;

use crate::types::HttpResponse;

/// Trait for the network link the terminal reports over.
/// Implement this trait for different stacks (ESP32 Wi-Fi, desktop, etc.)
pub trait NetworkTransport {
    /// Error type for transport operations
    type Error: std::fmt::Debug;

    /// Start joining the given network. Must not wait for the link to come up.
    fn begin_connect(&mut self, ssid: &str, password: &str) -> Result<(), Self::Error>;

    /// Whether the link is currently usable
    fn is_connected(&mut self) -> bool;

    /// Address acquired by the link, for display
    fn local_address(&mut self) -> Option<String>;

    /// Issue a blocking POST and return the HTTP response.
    /// An error means no response was received within `timeout`.
    fn post(
        &mut self,
        url: &str,
        content_type: &str,
        body: &[u8],
        timeout: Duration,
    ) -> Result<HttpResponse, Self::Error>;
}
