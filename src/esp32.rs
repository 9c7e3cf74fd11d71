//! Wi-Fi, HTTP and SNTP backends for ESP32 using esp-idf-svc

use chrono::{FixedOffset, NaiveTime, Offset, Utc};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::http::Method;
use esp_idf_svc::http::client::{Configuration as HttpConfiguration, EspHttpConnection};
use esp_idf_svc::io::{Read, Write};
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sntp::{EspSntp, SntpConf, SyncStatus};
use esp_idf_svc::sys::{ESP_ERR_INVALID_ARG, ESP_ERR_INVALID_STATE, EspError};
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};
use log::debug;
use std::time::Duration;

use crate::device::ClockSource;
use crate::transport::NetworkTransport;
use crate::types::HttpResponse;

/// Wi-Fi station link plus a one-shot HTTP client per request
pub struct EspWifiTransport<'d> {
    wifi: EspWifi<'d>,
}

impl<'d> EspWifiTransport<'d> {
    pub fn new(
        modem: impl Peripheral<P = Modem> + 'd,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
    ) -> Result<Self, EspError> {
        let wifi = EspWifi::new(modem, sysloop, nvs)?;
        Ok(Self { wifi })
    }
}

impl NetworkTransport for EspWifiTransport<'_> {
    type Error = EspError;

    fn begin_connect(&mut self, ssid: &str, password: &str) -> Result<(), Self::Error> {
        let invalid_arg = || EspError::from_infallible::<ESP_ERR_INVALID_ARG>();
        let config = Configuration::Client(ClientConfiguration {
            ssid: ssid.try_into().map_err(|_| invalid_arg())?,
            password: password.try_into().map_err(|_| invalid_arg())?,
            auth_method: if password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        });
        self.wifi.set_configuration(&config)?;
        self.wifi.start()?;
        self.wifi.connect()
    }

    fn is_connected(&mut self) -> bool {
        self.wifi.is_connected().unwrap_or(false) && self.wifi.sta_netif().is_up().unwrap_or(false)
    }

    fn local_address(&mut self) -> Option<String> {
        self.wifi
            .sta_netif()
            .get_ip_info()
            .ok()
            .map(|info| info.ip.to_string())
    }

    fn post(
        &mut self,
        url: &str,
        content_type: &str,
        body: &[u8],
        timeout: Duration,
    ) -> Result<HttpResponse, Self::Error> {
        let mut conn = EspHttpConnection::new(&HttpConfiguration {
            timeout: Some(timeout),
            ..Default::default()
        })?;

        let content_length = body.len().to_string();
        let headers = [
            ("Content-Type", content_type),
            ("Content-Length", content_length.as_str()),
        ];
        conn.initiate_request(Method::Post, url, &headers)?;
        conn.write_all(body)?;
        conn.initiate_response()?;

        let status = conn.status();
        let mut response = Vec::new();
        let mut buf = [0u8; 256];
        loop {
            let read = conn.read(&mut buf)?;
            if read == 0 {
                break;
            }
            response.extend_from_slice(&buf[..read]);
        }
        debug!("HTTP {} with {} body bytes", status, response.len());

        Ok(HttpResponse {
            status,
            body: response,
        })
    }
}

/// Wall clock synchronized over SNTP, rendered at a fixed offset from UTC
pub struct EspSntpClock {
    sntp: Option<EspSntp<'static>>,
    offset: FixedOffset,
    synced: bool,
}

impl EspSntpClock {
    pub fn new() -> Self {
        Self {
            sntp: None,
            offset: Utc.fix(),
            synced: false,
        }
    }
}

impl Default for EspSntpClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for EspSntpClock {
    type Error = EspError;

    fn configure(
        &mut self,
        ntp_server: &str,
        utc_offset_secs: i32,
        dst_offset_secs: i32,
    ) -> Result<(), Self::Error> {
        self.offset = FixedOffset::east_opt(utc_offset_secs + dst_offset_secs)
            .ok_or_else(EspError::from_infallible::<ESP_ERR_INVALID_ARG>)?;
        let mut conf = SntpConf::default();
        conf.servers[0] = ntp_server;
        self.sntp = Some(EspSntp::new(&conf)?);
        self.synced = false;
        Ok(())
    }

    fn local_time(&mut self) -> Result<NaiveTime, Self::Error> {
        let sntp = self
            .sntp
            .as_ref()
            .ok_or_else(EspError::from_infallible::<ESP_ERR_INVALID_STATE>)?;
        if !self.synced {
            self.synced = sntp.get_sync_status() == SyncStatus::Completed;
        }
        if !self.synced {
            return Err(EspError::from_infallible::<ESP_ERR_INVALID_STATE>());
        }
        Ok(Utc::now().with_timezone(&self.offset).time())
    }
}
