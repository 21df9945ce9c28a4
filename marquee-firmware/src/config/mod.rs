//! Configuration loading
//!
//! The configuration is compiled into the image from marquee.toml and
//! parsed at boot with a small no_std parser.

pub mod toml;

use defmt::*;

use marquee_core::config::MarqueeConfig;

pub use toml::{parse_config, ParseError};

/// Embedded configuration (compiled into firmware)
/// Edit marquee.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../marquee.toml");

/// Load the embedded configuration, falling back to defaults if it is broken
///
/// build.rs already rejects an invalid marquee.toml, so the fallback only
/// matters when the two parsers disagree.
pub fn load_config() -> MarqueeConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            error!("Using default configuration");
            MarqueeConfig::default()
        }
    };

    if let Err(e) = config.validate() {
        warn!("Configuration problem: {}", e);
    }

    config
}
