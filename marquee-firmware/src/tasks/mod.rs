//! Embassy async tasks
//!
//! The application task owns all marquee state. The radio task owns the
//! CYW43 control handle and talks to the application only through
//! [`crate::channels`].

pub mod app;
pub mod net;
pub mod radio;

pub use app::app_task;
pub use net::{cyw43_task, net_task};
pub use radio::radio_task;
