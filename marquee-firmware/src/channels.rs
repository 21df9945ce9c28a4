//! Inter-task communication
//!
//! The application task never awaits the radio. It posts commands to
//! [`RADIO_COMMANDS`] and reads back whatever the radio task last published
//! in [`LINK_STATUS`] and [`LOCAL_ADDRESS`].

use core::cell::Cell;
use core::net::Ipv4Addr;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use portable_atomic::{AtomicU8, Ordering};

use marquee_hal::LinkStatus;

use crate::radio::RadioCommand;

/// Channel capacity for radio commands
pub const RADIO_COMMAND_QUEUE: usize = 8;

/// Commands from the application to the radio task
pub static RADIO_COMMANDS: Channel<CriticalSectionRawMutex, RadioCommand, RADIO_COMMAND_QUEUE> =
    Channel::new();

/// Last link status published by the radio task
static LINK_STATUS: AtomicU8 = AtomicU8::new(encode_status(LinkStatus::Idle));

/// Station address, present while the link is up
static LOCAL_ADDRESS: Mutex<CriticalSectionRawMutex, Cell<Option<Ipv4Addr>>> =
    Mutex::new(Cell::new(None));

/// Publish a new link status
pub fn set_link_status(status: LinkStatus) {
    LINK_STATUS.store(encode_status(status), Ordering::Release);
}

/// Read the last published link status
pub fn link_status() -> LinkStatus {
    decode_status(LINK_STATUS.load(Ordering::Acquire))
}

/// Publish (or clear) the station address
pub fn set_local_address(address: Option<Ipv4Addr>) {
    LOCAL_ADDRESS.lock(|cell| cell.set(address));
}

/// Read the station address
pub fn local_address() -> Option<Ipv4Addr> {
    LOCAL_ADDRESS.lock(|cell| cell.get())
}

const fn encode_status(status: LinkStatus) -> u8 {
    match status {
        LinkStatus::Idle => 0,
        LinkStatus::Connecting => 1,
        LinkStatus::Connected => 2,
        LinkStatus::ConnectFailed => 3,
        LinkStatus::NoNetwork => 4,
        LinkStatus::Disconnected => 5,
    }
}

fn decode_status(raw: u8) -> LinkStatus {
    match raw {
        1 => LinkStatus::Connecting,
        2 => LinkStatus::Connected,
        3 => LinkStatus::ConnectFailed,
        4 => LinkStatus::NoNetwork,
        5 => LinkStatus::Disconnected,
        _ => LinkStatus::Idle,
    }
}
