//! Events reported by the connectivity state machine

use core::net::Ipv4Addr;

/// Outcome of one connectivity tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// Station mode set and first connect issued
    Started,
    /// Still waiting for the link (`attempt` failed checks so far)
    Pending { attempt: u16 },
    /// Still waiting; the connect was re-issued on this tick
    Retrying { attempt: u16 },
    /// Link is up
    Connected { address: Option<Ipv4Addr> },
    /// Deadline reached without a link
    Failed { attempts: u16 },
    /// Machine already finished; nothing was done
    Inactive,
}

impl LinkEvent {
    /// Check if this event ends the connect cycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, LinkEvent::Connected { .. } | LinkEvent::Failed { .. })
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LinkEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            LinkEvent::Started => defmt::write!(f, "Started"),
            LinkEvent::Pending { attempt } => defmt::write!(f, "Pending({})", attempt),
            LinkEvent::Retrying { attempt } => defmt::write!(f, "Retrying({})", attempt),
            LinkEvent::Connected { address: Some(addr) } => {
                defmt::write!(f, "Connected({})", defmt::Display2Format(addr))
            }
            LinkEvent::Connected { address: None } => defmt::write!(f, "Connected(?)"),
            LinkEvent::Failed { attempts } => defmt::write!(f, "Failed({})", attempts),
            LinkEvent::Inactive => defmt::write!(f, "Inactive"),
        }
    }
}
