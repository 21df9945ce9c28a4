//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in marquee-hal:
//!
//! - HT1632C LED matrix panels (bit-banged 3-wire bus)
//! - Built-in 5x7 ASCII font

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod font;
pub mod ht1632;

pub use ht1632::Ht1632;
