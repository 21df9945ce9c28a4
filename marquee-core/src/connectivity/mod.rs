//! WiFi connectivity state machine
//!
//! Brings the station link up once at boot. Driven by a periodic task;
//! every tick returns a [`LinkEvent`] describing what happened so the caller
//! can start the HTTP listener or disable the task.

pub mod events;
pub mod machine;

pub use events::LinkEvent;
pub use machine::{Connectivity, LinkState, RetryPolicy};
