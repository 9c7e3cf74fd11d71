//! Link establishment and clock synchronization at startup

use log::{debug, error, info, warn};

use crate::config::TerminalConfig;
use crate::device::{ClockSource, DisplaySink, Timebase};
use crate::screen::{
    self, DISPLAY_COLUMNS, MSG_CHECK_NETWORK, MSG_CLOCK_NOT_SYNCED, MSG_CLOCK_SYNCED,
    MSG_CONNECTED, MSG_CONNECTING, MSG_LINK_FAILED, MSG_SPLASH_STARTING, MSG_SPLASH_TITLE, Screen,
};
use crate::transport::NetworkTransport;
use crate::types::{LinkInfo, TerminalError};

const PROGRESS_ROW: usize = 1;

/// Show the boot splash for the startup dwell
pub fn show_splash<D: DisplaySink, T: Timebase>(
    screen: &mut Screen<D>,
    timebase: &mut T,
    config: &TerminalConfig,
) {
    screen.render(MSG_SPLASH_TITLE, MSG_SPLASH_STARTING);
    timebase.delay_ms(config.timings.startup_dwell_ms);
}

/// Join the configured network, animating progress on the second row.
///
/// Checks connectivity according to `config.link_retry`. On success the
/// acquired address is shown for the startup dwell.
pub fn establish_link<N, D, T>(
    network: &mut N,
    screen: &mut Screen<D>,
    timebase: &mut T,
    config: &TerminalConfig,
) -> Result<LinkInfo, TerminalError>
where
    N: NetworkTransport,
    D: DisplaySink,
    T: Timebase,
{
    let ssid = config.wifi_ssid.as_str();
    info!("Connecting to {}", ssid);
    screen.render(MSG_CONNECTING, ssid);

    if let Err(e) = network.begin_connect(ssid, &config.wifi_password) {
        warn!("Failed to start connecting: {:?}", e);
    }

    let policy = config.link_retry;
    let mut progress = Progress::new(ssid);
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        if network.is_connected() {
            break;
        }
        if policy.max_attempts.is_some_and(|max| attempts >= max) {
            error!("Link not up after {} attempts", attempts);
            screen.render(MSG_LINK_FAILED, MSG_CHECK_NETWORK);
            return Err(TerminalError::StartupFailed { attempts });
        }
        let delay = policy.backoff.delay_ms(attempts);
        debug!("Link down (attempt {}), waiting {} ms", attempts, delay);
        timebase.delay_ms(delay);
        progress.tick(screen);
    }

    let address = network.local_address();
    info!("Connected after {} attempts, address {:?}", attempts, address);
    screen.render(
        MSG_CONNECTED,
        &format!("IP: {}", address.as_deref().unwrap_or("-")),
    );
    timebase.delay_ms(config.timings.startup_dwell_ms);

    Ok(LinkInfo { address, attempts })
}

/// Point the clock source at the NTP server and confirm on screen.
///
/// A failure here only shows on screen; the clock line reports it later.
pub fn synchronize_clock<C, D, T>(
    clock: &mut C,
    screen: &mut Screen<D>,
    timebase: &mut T,
    config: &TerminalConfig,
) where
    C: ClockSource,
    D: DisplaySink,
    T: Timebase,
{
    match clock.configure(
        &config.ntp_server,
        config.utc_offset_secs,
        config.dst_offset_secs,
    ) {
        Ok(()) => {
            info!("Clock source configured with {}", config.ntp_server);
            screen.render(MSG_CLOCK_SYNCED, "");
        }
        Err(e) => {
            warn!("Clock source configuration failed: {:?}", e);
            screen.render(MSG_CLOCK_NOT_SYNCED, "");
        }
    }
    timebase.delay_ms(config.timings.startup_dwell_ms);
}

/// Dots appended after the network name, wrapped before they leave the row
struct Progress {
    label: String,
    start_col: usize,
    dots: usize,
}

impl Progress {
    fn new(ssid: &str) -> Self {
        let label = screen::fit(ssid);
        let start_col = label.chars().count();
        Self {
            label,
            start_col,
            dots: 0,
        }
    }

    fn capacity(&self) -> usize {
        DISPLAY_COLUMNS - self.start_col
    }

    fn tick<D: DisplaySink>(&mut self, screen: &mut Screen<D>) {
        if self.capacity() == 0 {
            return;
        }
        if self.dots == self.capacity() {
            screen.render_line(PROGRESS_ROW, &self.label);
            self.dots = 0;
        }
        screen.write_at(self.start_col + self.dots, PROGRESS_ROW, ".");
        self.dots += 1;
    }
}
