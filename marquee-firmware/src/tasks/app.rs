//! Application task
//!
//! Wakes whenever the scheduler has work. While the HTTP listener is up the
//! wait between ticks is spent accepting clients instead of sleeping.

use defmt::*;
use embassy_net::Stack;
use embassy_time::{Instant, Timer};
use static_cell::StaticCell;

use crate::server::{self, ServerBuffers};
use crate::App;

/// Upper bound on a sleep when no task is due
const IDLE_WAKE_MS: u64 = 1000;

static BUFFERS: StaticCell<ServerBuffers> = StaticCell::new();

#[embassy_executor::task]
pub async fn app_task(app: &'static mut App, stack: Stack<'static>) -> ! {
    info!("Application task started");

    let bufs = BUFFERS.init_with(ServerBuffers::new);

    loop {
        let now = Instant::now().as_millis();
        let ran = app.run_due(now);
        if ran > 0 {
            trace!("{} task(s) ran at {}ms", ran, now);
        }

        let deadline = Instant::from_millis(app.next_due().unwrap_or(now + IDLE_WAKE_MS));

        if app.listener_active() {
            server::serve_until(stack, app, deadline, bufs).await;
        } else {
            Timer::at(deadline).await;
        }
    }
}
