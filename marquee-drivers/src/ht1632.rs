//! HT1632C LED matrix driver
//!
//! Drives a chain of 32x8 HT1632C panels over the chip's 3-wire serial
//! interface, bit-banged on GPIO. Every panel has its own chip-select; the
//! WR clock and DATA lines are shared. Data is latched on the rising edge
//! of WR.
//!
//! Frames:
//! - Command: `100` + 8 command bits + 1 don't-care bit
//! - Write:   `101` + 7-bit RAM address + data, D0 first
//!
//! Each panel column is one byte of display RAM (two nibble addresses),
//! bit 0 = top row, so a whole frame is a single successive write from
//! address 0.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use marquee_hal::{DisplayError, MatrixDisplay};

use crate::font::{self, ADVANCE, GLYPH_WIDTH};

/// Columns per panel
pub const COLUMNS: usize = 32;

/// Rows per panel
pub const ROWS: usize = 8;

/// Half period of the WR clock (ns)
const CLOCK_HALF_PERIOD_NS: u32 = 500;

/// Frame IDs
const ID_COMMAND: u16 = 0b100;
const ID_WRITE: u16 = 0b101;

/// HT1632C commands
#[allow(dead_code)]
mod cmd {
    pub const SYS_DIS: u8 = 0x00;
    pub const SYS_EN: u8 = 0x01;
    pub const LED_OFF: u8 = 0x02;
    pub const LED_ON: u8 = 0x03;
    pub const BLINK_OFF: u8 = 0x08;
    pub const BLINK_ON: u8 = 0x09;
    pub const SLAVE_MODE: u8 = 0x10;
    pub const MASTER_MODE: u8 = 0x14;
    pub const RC_MASTER_MODE: u8 = 0x18;
    /// N-MOS open drain, 8 COM lines
    pub const COM_NMOS_8: u8 = 0x20;
    /// PWM duty, OR with 0..=15
    pub const PWM: u8 = 0xA0;
}

/// Power-up sequence sent to every panel
const INIT_SEQUENCE: [u8; 7] = [
    cmd::SYS_DIS,
    cmd::COM_NMOS_8,
    cmd::MASTER_MODE,
    cmd::SYS_EN,
    cmd::LED_ON,
    cmd::BLINK_OFF,
    cmd::PWM | 0x0F,
];

/// HT1632C panel chain of `N` panels
pub struct Ht1632<P, D, const N: usize> {
    cs: [P; N],
    wr: P,
    data: P,
    delay: D,
    /// One frame buffer per panel
    frames: [[u8; COLUMNS]; N],
    active: usize,
    initialized: bool,
}

impl<P, D, const N: usize> Ht1632<P, D, N>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Create a driver; the bus is left untouched until `begin`
    pub fn new(cs: [P; N], wr: P, data: P, delay: D) -> Self {
        Self {
            cs,
            wr,
            data,
            delay,
            frames: [[0; COLUMNS]; N],
            active: 0,
            initialized: false,
        }
    }

    /// Frame buffer of a panel
    pub fn frame(&self, panel: usize) -> Option<&[u8; COLUMNS]> {
        self.frames.get(panel)
    }

    /// Set the PWM brightness (0..=15) of every panel
    pub fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError> {
        let command = cmd::PWM | level.min(0x0F);
        for panel in 0..N {
            self.command(panel, command)?;
        }
        Ok(())
    }

    fn command(&mut self, panel: usize, command: u8) -> Result<(), DisplayError> {
        self.select(panel)?;
        let result = self
            .write_bits(ID_COMMAND, 3)
            .and_then(|_| self.write_bits(command as u16, 8))
            .and_then(|_| self.write_bits(0, 1));
        self.deselect(panel)?;
        result
    }

    fn write_frame(&mut self, panel: usize) -> Result<(), DisplayError> {
        self.select(panel)?;
        let result = self.write_frame_bits(panel);
        self.deselect(panel)?;
        result
    }

    fn write_frame_bits(&mut self, panel: usize) -> Result<(), DisplayError> {
        self.write_bits(ID_WRITE, 3)?;
        self.write_bits(0, 7)?;
        let frame = self.frames[panel];
        for column in frame {
            for row in 0..ROWS {
                self.write_bit(column & (1 << row) != 0)?;
            }
        }
        Ok(())
    }

    /// Clock out the low `count` bits of `value`, MSB first
    fn write_bits(&mut self, value: u16, count: u8) -> Result<(), DisplayError> {
        for bit in (0..count).rev() {
            self.write_bit(value & (1 << bit) != 0)?;
        }
        Ok(())
    }

    fn write_bit(&mut self, high: bool) -> Result<(), DisplayError> {
        self.wr.set_low().map_err(bus_error)?;
        if high {
            self.data.set_high().map_err(bus_error)?;
        } else {
            self.data.set_low().map_err(bus_error)?;
        }
        self.delay.delay_ns(CLOCK_HALF_PERIOD_NS);
        self.wr.set_high().map_err(bus_error)?;
        self.delay.delay_ns(CLOCK_HALF_PERIOD_NS);
        Ok(())
    }

    fn select(&mut self, panel: usize) -> Result<(), DisplayError> {
        self.cs[panel].set_low().map_err(bus_error)
    }

    fn deselect(&mut self, panel: usize) -> Result<(), DisplayError> {
        self.cs[panel].set_high().map_err(bus_error)
    }
}

fn bus_error<E>(_: E) -> DisplayError {
    DisplayError::Communication
}

impl<P, D, const N: usize> MatrixDisplay for Ht1632<P, D, N>
where
    P: OutputPin,
    D: DelayNs,
{
    fn begin(&mut self) -> Result<(), DisplayError> {
        for cs in self.cs.iter_mut() {
            cs.set_high().map_err(bus_error)?;
        }
        self.wr.set_high().map_err(bus_error)?;

        for panel in 0..N {
            for command in INIT_SEQUENCE {
                self.command(panel, command)?;
            }
            self.frames[panel] = [0; COLUMNS];
            self.write_frame(panel)?;
        }

        self.active = 0;
        self.initialized = true;
        Ok(())
    }

    fn select_segment(&mut self, segment: u8) -> Result<(), DisplayError> {
        if segment as usize >= N {
            return Err(DisplayError::InvalidSegment);
        }
        self.active = segment as usize;
        Ok(())
    }

    fn clear(&mut self) {
        if let Some(frame) = self.frames.get_mut(self.active) {
            *frame = [0; COLUMNS];
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        let Some(frame) = self.frames.get_mut(self.active) else {
            return;
        };
        if y <= -(ROWS as i32) || y >= ROWS as i32 {
            return;
        }

        let mut start = x;
        for ch in text.chars() {
            if start >= COLUMNS as i32 {
                break;
            }
            if start + GLYPH_WIDTH as i32 > 0 {
                for (i, bits) in font::glyph(ch).iter().enumerate() {
                    let column = start + i as i32;
                    if (0..COLUMNS as i32).contains(&column) {
                        let shifted = if y >= 0 { bits << y } else { bits >> -y };
                        frame[column as usize] |= shifted;
                    }
                }
            }
            start += ADVANCE as i32;
        }
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        self.write_frame(self.active)
    }

    fn text_width(&self, text: &str) -> u16 {
        font::text_width(text)
    }

    fn segment_count(&self) -> u8 {
        N as u8
    }

    fn segment_width(&self) -> u16 {
        COLUMNS as u16
    }
}
