//! Terminal configuration, built once at startup and shared by reference

/// Path the backend exposes for card reports
pub const REPORT_PATH: &str = "/registros/rfid";

/// Delay schedule between connectivity checks during link bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every check
    Fixed(u64),
    /// Doubles after every failed check, capped at `max_ms`
    Exponential { initial_ms: u64, max_ms: u64 },
}

impl Backoff {
    /// Delay to wait after the given failed check (1-based)
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        match *self {
            Self::Fixed(ms) => ms,
            Self::Exponential { initial_ms, max_ms } => {
                let shift = attempt.saturating_sub(1).min(63);
                initial_ms.saturating_mul(1u64 << shift).min(max_ms)
            }
        }
    }
}

/// Retry policy for link establishment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// `None` keeps retrying forever
    pub max_attempts: Option<u32>,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Some(120),
            backoff: Backoff::Fixed(500),
        }
    }
}

/// Cadences and dwell periods, in milliseconds unless noted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub clock_refresh_ms: u64,
    pub tag_read_dwell_ms: u64,
    pub outcome_dwell_ms: u64,
    pub startup_dwell_ms: u64,
    pub http_timeout_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            clock_refresh_ms: 1000,
            tag_read_dwell_ms: 1000,
            outcome_dwell_ms: 3000,
            startup_dwell_ms: 2000,
            http_timeout_ms: 10_000,
        }
    }
}

/// Device configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalConfig {
    pub wifi_ssid: String,
    pub wifi_password: String,
    pub server_host: String,
    pub server_port: u16,
    /// Identifies this physical reader to the backend
    pub reader_id: i64,
    pub ntp_server: String,
    pub utc_offset_secs: i32,
    pub dst_offset_secs: i32,
    pub timings: Timings,
    pub link_retry: RetryPolicy,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: "TU_NOMBRE_DE_WIFI".into(),
            wifi_password: "TU_CONTRASENA_DE_WIFI".into(),
            server_host: "192.168.128.10".into(),
            server_port: 8080,
            reader_id: 1,
            ntp_server: "pool.ntp.org".into(),
            utc_offset_secs: -5 * 3600,
            dst_offset_secs: 0,
            timings: Timings::default(),
            link_retry: RetryPolicy::default(),
        }
    }
}

impl TerminalConfig {
    /// Full URL card reports are POSTed to
    pub fn report_url(&self) -> String {
        format!("http://{}:{}{}", self.server_host, self.server_port, REPORT_PATH)
    }
}
