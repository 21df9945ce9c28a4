//! Configuration type definitions

use heapless::String;

use crate::message::MAX_TEXT_LEN;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum SSID length (802.11)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WPA2 passphrase length
pub const MAX_PASSWORD_LEN: usize = 64;

/// Maximum DHCP hostname length
pub const MAX_HOSTNAME_LEN: usize = 32;

/// Maximum number of chained panels
pub const MAX_SEGMENTS: u8 = 8;

/// Greeting shown until the first remote update
pub const DEFAULT_TEXT: &str = "Hello, how are you?";

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// SSID is empty
    MissingSsid,
    /// Segment count outside 1..=MAX_SEGMENTS
    InvalidSegmentCount,
    /// Segment width is zero
    InvalidSegmentWidth,
    /// A task interval is zero
    InvalidInterval,
    /// Retry cadence is zero or deadline is zero
    InvalidRetryPolicy,
}

/// WiFi station credentials
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WifiConfig {
    /// Network name
    pub ssid: String<MAX_SSID_LEN>,
    /// Passphrase (empty for open networks)
    pub password: String<MAX_PASSWORD_LEN>,
    /// Hostname announced when reconnecting
    pub hostname: String<MAX_HOSTNAME_LEN>,
}

impl Default for WifiConfig {
    fn default() -> Self {
        let mut hostname = String::new();
        let _ = hostname.push_str("marquee");
        Self {
            ssid: String::new(),
            password: String::new(),
            hostname,
        }
    }
}

/// Panel chain geometry and scroll timing
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    /// Number of chained panels
    pub segments: u8,
    /// Columns per panel
    pub segment_width: u16,
    /// Scroll tick interval (ms)
    pub scroll_interval_ms: u32,
    /// Text shown at boot
    pub default_text: String<MAX_TEXT_LEN>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let mut default_text = String::new();
        let _ = default_text.push_str(DEFAULT_TEXT);
        Self {
            segments: 4,
            segment_width: 32,
            scroll_interval_ms: 80,
            default_text,
        }
    }
}

/// Connection retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConnectConfig {
    /// Interval between link checks (ms)
    pub check_interval_ms: u32,
    /// Re-issue the connect every this many failed checks
    pub retry_every: u16,
    /// Give up after this many failed checks
    pub deadline: u16,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: 1000,
            retry_every: 15,
            deadline: 30,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MarqueeConfig {
    pub wifi: WifiConfig,
    pub display: DisplayConfig,
    pub connect: ConnectConfig,
}

impl MarqueeConfig {
    /// Check the configuration for values the runtime cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wifi.ssid.is_empty() {
            return Err(ConfigError::MissingSsid);
        }
        if self.display.segments == 0 || self.display.segments > MAX_SEGMENTS {
            return Err(ConfigError::InvalidSegmentCount);
        }
        if self.display.segment_width == 0 {
            return Err(ConfigError::InvalidSegmentWidth);
        }
        if self.display.scroll_interval_ms == 0 || self.connect.check_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        if self.connect.retry_every == 0 || self.connect.deadline == 0 {
            return Err(ConfigError::InvalidRetryPolicy);
        }
        Ok(())
    }
}
