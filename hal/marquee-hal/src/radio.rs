//! WiFi radio abstraction
//!
//! Commands are fire-and-forget: `begin_connect` starts an association and
//! returns immediately, progress is observed by polling [`WifiRadio::status`].
//! Implementations must never block the caller waiting for the access point.

use core::net::Ipv4Addr;

/// Radio command errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError {
    /// Radio cannot accept another command right now
    Busy,
    /// Credentials rejected before any attempt (bad length etc.)
    InvalidCredentials,
    /// Radio hardware not initialized
    NotReady,
}

/// Station link status as reported by the radio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    /// No association in progress
    Idle,
    /// Association or address negotiation in progress
    Connecting,
    /// Associated and holding an address
    Connected,
    /// Last association attempt was rejected or timed out
    ConnectFailed,
    /// Configured network not found
    NoNetwork,
    /// Link dropped or explicitly disconnected
    Disconnected,
}

impl LinkStatus {
    /// Check if the link is up
    pub fn is_connected(&self) -> bool {
        matches!(self, LinkStatus::Connected)
    }
}

/// WiFi station radio
pub trait WifiRadio {
    /// Switch the radio into station (client) mode
    fn start_station_mode(&mut self) -> Result<(), RadioError>;

    /// Set the DHCP hostname used by subsequent connects
    fn set_hostname(&mut self, hostname: &str) -> Result<(), RadioError>;

    /// Start associating with `ssid`
    fn begin_connect(&mut self, ssid: &str, password: &str) -> Result<(), RadioError>;

    /// Drop the current association (or abandon the pending one)
    fn disconnect(&mut self) -> Result<(), RadioError>;

    /// Current link status
    fn status(&self) -> LinkStatus;

    /// Address assigned to this station, once connected
    fn local_address(&self) -> Option<Ipv4Addr>;
}
