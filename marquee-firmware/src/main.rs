//! Marquee - Networked LED Matrix Scroller Firmware
//!
//! Firmware for a Raspberry Pi Pico W driving four chained HT1632C 32x8
//! panels. Text scrolls across the chain from power-up; once WiFi is up a
//! small HTTP API accepts replacement text.

#![no_std]
#![no_main]

extern crate alloc;

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::{Config, DhcpConfig, StackResources};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler, Pio};
use embassy_time::{Delay, Instant};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use marquee_core::Marquee;
use marquee_drivers::Ht1632;

use crate::radio::ChannelRadio;

mod channels;
mod config;
mod radio;
mod server;
mod tasks;

/// Number of chained panels on the board
pub const PANELS: usize = 4;

/// The panel chain as wired on the board
pub type Display = Ht1632<Output<'static>, Delay, PANELS>;

/// The application as run by this firmware
pub type App = Marquee<Display, ChannelRadio>;

// Heap allocator for JSON parsing
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 16KB
const HEAP_SIZE: usize = 16 * 1024;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
static APP: StaticCell<App> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Marquee firmware starting...");

    // Initialize heap allocator
    init_heap();

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();
    if config.display.segments as usize != PANELS {
        warn!(
            "marquee.toml declares {} segments, board has {}",
            config.display.segments, PANELS
        );
    }

    // CYW43439 radio on PIO0 (Pico W wiring: PWR=GPIO23, CS=GPIO25, DIO=GPIO24, CLK=GPIO29)
    let fw = include_bytes!("../cyw43-firmware/43439A0.bin");
    let clm = include_bytes!("../cyw43-firmware/43439A0_clm.bin");

    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(unwrap!(tasks::cyw43_task(runner)));

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;
    info!("Radio initialized");

    // Network stack; the hostname rides along with every DHCP request
    let mut dhcp = DhcpConfig::default();
    dhcp.hostname = Some(config.wifi.hostname.clone());
    let seed = 0x7c8f_3a2e_9d14_6b5a;
    let (stack, runner) = embassy_net::new(
        net_device,
        Config::dhcpv4(dhcp),
        RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(unwrap!(tasks::net_task(runner)));
    spawner.spawn(unwrap!(tasks::radio_task(control, stack)));

    // HT1632C chain (CS=GPIO18,19,21,22, WR=GPIO17, DATA=GPIO16)
    let display: Display = Ht1632::new(
        [
            Output::new(p.PIN_18, Level::High),
            Output::new(p.PIN_19, Level::High),
            Output::new(p.PIN_21, Level::High),
            Output::new(p.PIN_22, Level::High),
        ],
        Output::new(p.PIN_17, Level::High),
        Output::new(p.PIN_16, Level::Low),
        Delay,
    );

    let app = APP.init(Marquee::new(config, display, ChannelRadio::new()));
    if let Err(e) = app.start(Instant::now().as_millis()) {
        // Keep going: the radio and listener still work without panels
        error!("Startup failed: {}", e);
    }

    spawner.spawn(unwrap!(tasks::app_task(app, stack)));

    info!("All tasks spawned, firmware running");
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
