//! Connectivity state machine definition
//!
//! ```text
//! Idle ──▶ Connecting ──▶ Verifying ──┬──▶ Connected
//!                           ▲   │      │
//!                           └───┘      └──▶ Failed
//! ```
//!
//! `Connecting` only lasts for the activation tick. Every later tick is a
//! verification: a failed check bumps the attempt counter, every
//! `retry_every` failures the connect is re-issued, and at `deadline`
//! failures the machine gives up for good.

use marquee_hal::WifiRadio;

use super::events::LinkEvent;
use crate::config::{ConnectConfig, WifiConfig};

/// Connectivity states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Not started
    Idle,
    /// Issuing the initial connect
    Connecting,
    /// Waiting for the radio to report a link
    Verifying,
    /// Link up, listener running
    Connected,
    /// Deadline reached; no further attempts
    Failed,
}

impl LinkState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, LinkState::Connected | LinkState::Failed)
    }
}

/// Retry cadence and deadline, both counted in failed checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Re-issue the connect every this many failed checks
    pub retry_every: u16,
    /// Give up after this many failed checks
    pub deadline: u16,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_every: 15,
            deadline: 30,
        }
    }
}

impl From<&ConnectConfig> for RetryPolicy {
    fn from(config: &ConnectConfig) -> Self {
        Self {
            retry_every: config.retry_every,
            deadline: config.deadline,
        }
    }
}

/// Connectivity state machine
///
/// Owns the attempt counter; the radio and credentials are lent per tick.
#[derive(Debug, Clone)]
pub struct Connectivity {
    state: LinkState,
    attempts: u16,
    policy: RetryPolicy,
}

impl Connectivity {
    /// Create an idle machine
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            state: LinkState::Idle,
            attempts: 0,
            policy,
        }
    }

    /// Current state
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Failed checks in the current connect cycle
    pub fn attempts(&self) -> u16 {
        self.attempts
    }

    /// Return to `Idle` so the next tick starts a fresh connect cycle
    pub fn reset(&mut self) {
        self.state = LinkState::Idle;
        self.attempts = 0;
    }

    /// Run one tick of the machine
    pub fn tick<R: WifiRadio>(&mut self, radio: &mut R, wifi: &WifiConfig) -> LinkEvent {
        match self.state {
            LinkState::Idle | LinkState::Connecting => self.start(radio, wifi),
            LinkState::Verifying => self.verify(radio, wifi),
            LinkState::Connected | LinkState::Failed => LinkEvent::Inactive,
        }
    }

    fn start<R: WifiRadio>(&mut self, radio: &mut R, wifi: &WifiConfig) -> LinkEvent {
        self.state = LinkState::Connecting;
        self.attempts = 0;
        info!("Connecting to WiFi network {}", wifi.ssid.as_str());

        if let Err(e) = radio.start_station_mode() {
            warn!("Station mode request failed: {}", e);
        }
        if let Err(e) = radio.begin_connect(&wifi.ssid, &wifi.password) {
            warn!("Connect request failed: {}", e);
        }

        self.state = LinkState::Verifying;
        LinkEvent::Started
    }

    fn verify<R: WifiRadio>(&mut self, radio: &mut R, wifi: &WifiConfig) -> LinkEvent {
        let status = radio.status();
        if status.is_connected() {
            self.state = LinkState::Connected;
            let address = radio.local_address();
            info!("Connected to access point after {} checks", self.attempts);
            return LinkEvent::Connected { address };
        }

        self.attempts = self.attempts.saturating_add(1);
        debug!("Link check {}: {}", self.attempts, status);

        // A zero cadence disables retries instead of dividing by zero
        let retried =
            self.policy.retry_every != 0 && self.attempts % self.policy.retry_every == 0;
        if retried {
            info!("Re-requesting connection to access point");
            self.reconnect(radio, wifi);
        }

        if self.attempts >= self.policy.deadline {
            self.state = LinkState::Failed;
            error!("Unable to connect to WiFi after {} checks", self.attempts);
            return LinkEvent::Failed {
                attempts: self.attempts,
            };
        }

        if retried {
            LinkEvent::Retrying {
                attempt: self.attempts,
            }
        } else {
            LinkEvent::Pending {
                attempt: self.attempts,
            }
        }
    }

    fn reconnect<R: WifiRadio>(&mut self, radio: &mut R, wifi: &WifiConfig) {
        let result = radio
            .disconnect()
            .and_then(|_| radio.set_hostname(&wifi.hostname))
            .and_then(|_| radio.start_station_mode())
            .and_then(|_| radio.begin_connect(&wifi.ssid, &wifi.password));
        if let Err(e) = result {
            warn!("Reconnect request failed: {}", e);
        }
    }
}
