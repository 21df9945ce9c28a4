//! Radio command task
//!
//! Executes [`RadioCommand`]s one at a time and publishes the outcome for
//! [`crate::radio::ChannelRadio`] to read back.

use cyw43::JoinOptions;
use defmt::*;
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration};

use marquee_hal::LinkStatus;

use crate::channels::{self, RADIO_COMMANDS};
use crate::radio::RadioCommand;

/// How long to wait for a DHCP lease after joining
const DHCP_TIMEOUT: Duration = Duration::from_secs(10);

#[embassy_executor::task]
pub async fn radio_task(mut control: cyw43::Control<'static>, stack: Stack<'static>) -> ! {
    info!("Radio task started");

    loop {
        match RADIO_COMMANDS.receive().await {
            RadioCommand::StationMode => {
                // The CYW43 comes up as a station; nothing to switch
                debug!("Station mode");
            }
            RadioCommand::SetHostname(hostname) => {
                // Applied through the DHCP client configured at boot
                debug!("Hostname: {}", hostname.as_str());
            }
            RadioCommand::Disconnect => {
                control.leave().await;
                channels::set_local_address(None);
                channels::set_link_status(LinkStatus::Disconnected);
                debug!("Left network");
            }
            RadioCommand::Connect { ssid, password } => {
                channels::set_link_status(LinkStatus::Connecting);
                info!("Joining {}", ssid.as_str());

                let options = if password.is_empty() {
                    JoinOptions::new_open()
                } else {
                    JoinOptions::new(password.as_bytes())
                };

                if let Err(e) = control.join(ssid.as_str(), options).await {
                    warn!("Join failed: status {}", e.status);
                    channels::set_link_status(LinkStatus::ConnectFailed);
                    continue;
                }

                if with_timeout(DHCP_TIMEOUT, stack.wait_config_up()).await.is_err() {
                    warn!("No DHCP lease");
                    channels::set_link_status(LinkStatus::ConnectFailed);
                    continue;
                }

                let address = stack.config_v4().map(|c| c.address.address());
                channels::set_local_address(address);
                channels::set_link_status(LinkStatus::Connected);
            }
        }
    }
}
