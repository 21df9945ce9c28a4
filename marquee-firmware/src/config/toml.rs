//! Minimal TOML parser for marquee.toml
//!
//! Handles only the subset the configuration file uses. It does NOT
//! support the full TOML spec.
//!
//! Supported features:
//! - `[wifi]`, `[display]` and `[connect]` section headers
//! - Key = value pairs (string, integer)
//! - Comments (# ...)

use heapless::String;

use marquee_core::config::MarqueeConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown section header
    InvalidSection,
    /// Unknown key in a known section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// String value does not fit its field
    TooLong,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Wifi,
    Display,
    Connect,
}

/// Parse TOML configuration into a `MarqueeConfig`
///
/// Keys that are not present keep their defaults.
pub fn parse_config(input: &str) -> Result<MarqueeConfig, ParseError> {
    let mut config = MarqueeConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "wifi" => Ok(Section::Wifi),
        "display" => Ok(Section::Display),
        "connect" => Ok(Section::Connect),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut MarqueeConfig,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Wifi, "ssid") => config.wifi.ssid = parse_bounded(value)?,
        (Section::Wifi, "password") => config.wifi.password = parse_bounded(value)?,
        (Section::Wifi, "hostname") => config.wifi.hostname = parse_bounded(value)?,
        (Section::Display, "segments") => config.display.segments = parse_int(value)?,
        (Section::Display, "segment_width") => config.display.segment_width = parse_int(value)?,
        (Section::Display, "scroll_interval_ms") => {
            config.display.scroll_interval_ms = parse_int(value)?
        }
        (Section::Display, "default_text") => config.display.default_text = parse_bounded(value)?,
        (Section::Connect, "check_interval_ms") => {
            config.connect.check_interval_ms = parse_int(value)?
        }
        (Section::Connect, "retry_every") => config.connect.retry_every = parse_int(value)?,
        (Section::Connect, "deadline") => config.connect.deadline = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseError::InvalidValue)
    }
}

/// Parse a quoted string into a bounded field
fn parse_bounded<const N: usize>(value: &str) -> Result<String<N>, ParseError> {
    let text = parse_string(value)?;
    String::try_from(text).map_err(|_| ParseError::TooLong)
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}
