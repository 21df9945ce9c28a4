//! Marquee Hardware Abstraction Layer
//!
//! This crate defines the capabilities the application logic needs from the
//! outside world. Chip and board specific code implements them; the core
//! crate only ever talks to these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (marquee-core, firmware)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  marquee-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │   marquee-    │       │   marquee-    │
//! │ drivers (LED) │       │ firmware (RF) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`display::MatrixDisplay`] - Multi-segment LED matrix panel chain
//! - [`radio::WifiRadio`] - WiFi station radio

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod radio;

// Re-export key traits at crate root for convenience
pub use display::{DisplayError, MatrixDisplay};
pub use radio::{LinkStatus, RadioError, WifiRadio};
