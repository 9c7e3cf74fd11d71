use log::{debug, info, warn};
use std::time::Duration;

use crate::bootstrap;
use crate::config::TerminalConfig;
use crate::device::{CardReader, ClockSource, DisplaySink, Timebase};
use crate::protocol::{self, CONTENT_TYPE_JSON};
use crate::screen::{
    DisplayState, MSG_CONNECTION_ERROR, MSG_DENIED, MSG_DISCONNECTED, MSG_GRANTED,
    MSG_PRESENT_CARD, MSG_TAG_READ, MSG_TIME_ERROR, Screen,
};
use crate::transport::NetworkTransport;
use crate::types::{AuthorizationOutcome, CardUid, LinkInfo, TerminalError, TransportErrorReason};

/// Cooperative controller tying the reader, display, network and clock together.
///
/// Each [`poll`](Self::poll) runs a scan check followed by a time-gated clock
/// refresh. The only blocking points are the POST and the fixed dwells.
pub struct AccessTerminal<'a, R, D, N, C, T>
where
    R: CardReader,
    D: DisplaySink,
    N: NetworkTransport,
    C: ClockSource,
    T: Timebase,
{
    config: &'a TerminalConfig,
    reader: R,
    screen: Screen<D>,
    network: N,
    clock: C,
    timebase: T,
    /// `None` forces a refresh on the next poll
    last_clock_refresh: Option<u64>,
}

impl<'a, R, D, N, C, T> AccessTerminal<'a, R, D, N, C, T>
where
    R: CardReader,
    D: DisplaySink,
    N: NetworkTransport,
    C: ClockSource,
    T: Timebase,
{
    /// Create a terminal from its collaborators
    pub fn new(config: &'a TerminalConfig, reader: R, display: D, network: N, clock: C, timebase: T) -> Self {
        Self {
            config,
            reader,
            screen: Screen::new(display),
            network,
            clock,
            timebase,
            last_clock_refresh: None,
        }
    }

    /// Boot sequence: splash, link bring-up, clock synchronization
    pub fn start(&mut self) -> Result<LinkInfo, TerminalError> {
        bootstrap::show_splash(&mut self.screen, &mut self.timebase, self.config);
        let link = bootstrap::establish_link(
            &mut self.network,
            &mut self.screen,
            &mut self.timebase,
            self.config,
        )?;
        bootstrap::synchronize_clock(&mut self.clock, &mut self.screen, &mut self.timebase, self.config);
        self.last_clock_refresh = None;
        info!("System ready, present a card");
        Ok(link)
    }

    /// Start, then poll forever
    pub fn run(&mut self) -> Result<(), TerminalError> {
        self.start()?;
        loop {
            self.poll();
        }
    }

    /// One loop iteration. Returns the outcome if a card was processed.
    pub fn poll(&mut self) -> Option<AuthorizationOutcome> {
        let outcome = self.check_card();
        self.refresh_clock_if_due();
        outcome
    }

    /// Text currently on the display
    pub fn display_state(&self) -> &DisplayState {
        self.screen.state()
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn display(&self) -> &D {
        self.screen.sink()
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn timebase(&self) -> &T {
        &self.timebase
    }

    pub fn timebase_mut(&mut self) -> &mut T {
        &mut self.timebase
    }

    fn check_card(&mut self) -> Option<AuthorizationOutcome> {
        if !self.reader.is_new_card_present() {
            return None;
        }
        let uid = self.reader.read_card_serial()?;

        let outcome = self.report(&uid);

        self.reader.halt();
        self.last_clock_refresh = None;
        Some(outcome)
    }

    /// Acknowledge the scan, report it and render the decision
    fn report(&mut self, uid: &CardUid) -> AuthorizationOutcome {
        let tag = uid.to_hex();
        info!("Tag read: {}", tag);
        self.screen.render(MSG_TAG_READ, &tag);
        self.timebase.delay_ms(self.config.timings.tag_read_dwell_ms);

        let outcome = if self.network.is_connected() {
            let payload = protocol::build_report_payload(uid, self.config.reader_id);
            let url = self.config.report_url();
            debug!("POST {}", url);
            let result = self.network.post(
                &url,
                CONTENT_TYPE_JSON,
                &payload,
                Duration::from_millis(self.config.timings.http_timeout_ms),
            );
            protocol::classify_response(result)
        } else {
            warn!("{}", TerminalError::LinkUnavailable);
            AuthorizationOutcome::TransportError {
                reason: TransportErrorReason::NotConnected,
            }
        };

        self.render_outcome(&outcome);
        self.timebase.delay_ms(self.config.timings.outcome_dwell_ms);
        outcome
    }

    fn render_outcome(&mut self, outcome: &AuthorizationOutcome) {
        match outcome {
            AuthorizationOutcome::Granted {
                holder_name,
                movement,
            } => {
                info!("Access granted to '{}' ({})", holder_name, movement);
                self.screen.render(MSG_GRANTED, holder_name);
            }
            AuthorizationOutcome::Denied { status_code } => {
                info!("{}", TerminalError::AuthorizationDenied(*status_code));
                self.screen.render(MSG_DENIED, &format!("Error: {}", status_code));
            }
            AuthorizationOutcome::TransportError {
                reason: TransportErrorReason::NotConnected,
            } => self.screen.render(MSG_DISCONNECTED, ""),
            AuthorizationOutcome::TransportError {
                reason: TransportErrorReason::NoResponse,
            } => self.screen.render(MSG_CONNECTION_ERROR, ""),
        }
    }

    /// Refresh the clock view when the cadence has elapsed or a refresh was forced.
    /// Returns whether a refresh ran.
    fn refresh_clock_if_due(&mut self) -> bool {
        let now = self.timebase.now_ms();
        if let Some(last) = self.last_clock_refresh {
            if now.saturating_sub(last) < self.config.timings.clock_refresh_ms {
                return false;
            }
        }
        self.last_clock_refresh = Some(now);

        match self.clock.local_time() {
            Ok(time) => {
                self.screen.render_line(0, &time.format("%H:%M:%S").to_string());
                self.screen.render_line(1, MSG_PRESENT_CARD);
            }
            Err(e) => {
                debug!("{}", TerminalError::ClockUnavailable(format!("{:?}", e)));
                self.screen.render_line(0, MSG_TIME_ERROR);
            }
        }
        true
    }
}
