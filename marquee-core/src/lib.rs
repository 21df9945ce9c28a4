//! Board-agnostic core logic for the LED scroller firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Shared message state (bounded text, pixel width, scroll offset)
//! - Render surface adapter over a [`marquee_hal::MatrixDisplay`]
//! - Scroll engine spreading one marquee across several panels
//! - WiFi connectivity state machine with retry and timeout
//! - Cooperative periodic task scheduler
//! - HTTP request parsing and the text update endpoint
//! - Configuration type definitions
//!
//! [`app::Marquee`] ties these together into the run loop the firmware drives.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod api;
pub mod app;
pub mod config;
pub mod connectivity;
pub mod message;
pub mod render;
pub mod scheduler;
pub mod scroll;

#[cfg(test)]
mod mock;

pub use app::{Marquee, StartError, TaskId};
