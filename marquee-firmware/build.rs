//! Build script for marquee-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates marquee.toml at compile time
//! - Checks that the CYW43439 firmware blobs are present

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use marquee_core::config::MarqueeConfig;

/// Radio firmware blobs, as shipped in the embassy repository's `cyw43-firmware/`
const RADIO_BLOBS: [&str; 2] = ["cyw43-firmware/43439A0.bin", "cyw43-firmware/43439A0_clm.bin"];

fn main() {
    setup_linker();
    validate_config();
    check_radio_firmware();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate marquee.toml against the runtime configuration types
fn validate_config() {
    println!("cargo:rerun-if-changed=marquee.toml");

    let config_path = Path::new("marquee.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: marquee.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a marquee.toml configuration file.        ║\n\
            ║  Please create one in the marquee-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read marquee.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: MarqueeConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid marquee.toml                                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: marquee.toml failed validation                           ║\n\
            ║                                                                  ║\n\
            ║  {:<64} ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            describe(e)
        );
    }

    println!("cargo:warning=marquee.toml validated successfully");
}

/// Explain a validation error in config-file terms
fn describe(e: marquee_core::config::ConfigError) -> &'static str {
    use marquee_core::config::ConfigError;

    match e {
        ConfigError::MissingSsid => "[wifi] ssid must not be empty",
        ConfigError::InvalidSegmentCount => "[display] segments must be between 1 and 8",
        ConfigError::InvalidSegmentWidth => "[display] segment_width must be non-zero",
        ConfigError::InvalidInterval => "task intervals must be non-zero",
        ConfigError::InvalidRetryPolicy => "[connect] retry_every and deadline must be non-zero",
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The radio firmware is not redistributed here; it has to be fetched once
fn check_radio_firmware() {
    for blob in RADIO_BLOBS {
        println!("cargo:rerun-if-changed={}", blob);
        if !Path::new(blob).exists() {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: CYW43439 firmware blob missing                           ║\n\
                ║                                                                  ║\n\
                ║  Expected: {:<53} ║\n\
                ║  Copy 43439A0.bin and 43439A0_clm.bin from the embassy           ║\n\
                ║  repository's cyw43-firmware/ directory.                         ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                blob
            );
        }
    }
}
