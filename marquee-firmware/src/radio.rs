//! Channel-backed WiFi radio
//!
//! [`ChannelRadio`] is the [`WifiRadio`] the application sees. Every command
//! is queued for the radio task and returns at once; status and address are
//! read from what the radio task last published.

use core::net::Ipv4Addr;

use heapless::String;

use marquee_core::config::{MAX_HOSTNAME_LEN, MAX_PASSWORD_LEN, MAX_SSID_LEN};
use marquee_hal::{LinkStatus, RadioError, WifiRadio};

use crate::channels::{self, RADIO_COMMANDS};

/// Work for the radio task
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioCommand {
    /// Run as a station
    StationMode,
    /// Hostname for the next DHCP lease
    SetHostname(String<MAX_HOSTNAME_LEN>),
    /// Join a network
    Connect {
        ssid: String<MAX_SSID_LEN>,
        password: String<MAX_PASSWORD_LEN>,
    },
    /// Leave the current network
    Disconnect,
}

/// Radio handle owned by the application
#[derive(Default)]
pub struct ChannelRadio {
    _private: (),
}

impl ChannelRadio {
    pub const fn new() -> Self {
        Self { _private: () }
    }

    fn post(&self, command: RadioCommand) -> Result<(), RadioError> {
        RADIO_COMMANDS
            .try_send(command)
            .map_err(|_| RadioError::Busy)
    }
}

impl WifiRadio for ChannelRadio {
    fn start_station_mode(&mut self) -> Result<(), RadioError> {
        self.post(RadioCommand::StationMode)
    }

    fn set_hostname(&mut self, hostname: &str) -> Result<(), RadioError> {
        let hostname = String::try_from(hostname).map_err(|_| RadioError::InvalidCredentials)?;
        self.post(RadioCommand::SetHostname(hostname))
    }

    fn begin_connect(&mut self, ssid: &str, password: &str) -> Result<(), RadioError> {
        let ssid = String::try_from(ssid).map_err(|_| RadioError::InvalidCredentials)?;
        let password = String::try_from(password).map_err(|_| RadioError::InvalidCredentials)?;
        if ssid.is_empty() {
            return Err(RadioError::InvalidCredentials);
        }

        self.post(RadioCommand::Connect { ssid, password })?;
        // Hide a stale Connected until the radio task picks the command up
        channels::set_link_status(LinkStatus::Connecting);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), RadioError> {
        self.post(RadioCommand::Disconnect)
    }

    fn status(&self) -> LinkStatus {
        channels::link_status()
    }

    fn local_address(&self) -> Option<Ipv4Addr> {
        channels::local_address()
    }
}
