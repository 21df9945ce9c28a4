//! Test doubles for the hardware capabilities

use std::net::Ipv4Addr;
use std::string::String;
use std::vec::Vec;

use marquee_hal::{DisplayError, LinkStatus, MatrixDisplay, RadioError, WifiRadio};

/// Fixed-pitch width used by [`MockDisplay`]: 5 px glyphs, 1 px spacing
pub fn mock_text_width(text: &str) -> u16 {
    match text.len() {
        0 => 0,
        n => (n * 6 - 1) as u16,
    }
}

/// One recorded display call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOp {
    Begin,
    Select(u8),
    Clear,
    Draw { text: String, x: i32, y: i32 },
    Flush,
}

/// Display that records every call
#[derive(Debug)]
pub struct MockDisplay {
    pub ops: Vec<DisplayOp>,
    pub segments: u8,
    pub width: u16,
    pub fail_begin: bool,
    pub fail_flush: bool,
}

impl MockDisplay {
    pub fn new(segments: u8, width: u16) -> Self {
        Self {
            ops: Vec::new(),
            segments,
            width,
            fail_begin: false,
            fail_flush: false,
        }
    }

    /// Draw calls only, as `(segment, text, x)`
    pub fn draws(&self) -> Vec<(u8, String, i32)> {
        let mut selected = 0;
        let mut out = Vec::new();
        for op in &self.ops {
            match op {
                DisplayOp::Select(s) => selected = *s,
                DisplayOp::Draw { text, x, .. } => out.push((selected, text.clone(), *x)),
                _ => {}
            }
        }
        out
    }
}

impl MatrixDisplay for MockDisplay {
    fn begin(&mut self) -> Result<(), DisplayError> {
        if self.fail_begin {
            return Err(DisplayError::Communication);
        }
        self.ops.push(DisplayOp::Begin);
        Ok(())
    }

    fn select_segment(&mut self, segment: u8) -> Result<(), DisplayError> {
        if segment >= self.segments {
            return Err(DisplayError::InvalidSegment);
        }
        self.ops.push(DisplayOp::Select(segment));
        Ok(())
    }

    fn clear(&mut self) {
        self.ops.push(DisplayOp::Clear);
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        self.ops.push(DisplayOp::Draw {
            text: text.into(),
            x,
            y,
        });
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        if self.fail_flush {
            return Err(DisplayError::Communication);
        }
        self.ops.push(DisplayOp::Flush);
        Ok(())
    }

    fn text_width(&self, text: &str) -> u16 {
        mock_text_width(text)
    }

    fn segment_count(&self) -> u8 {
        self.segments
    }

    fn segment_width(&self) -> u16 {
        self.width
    }
}

/// One recorded radio command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioOp {
    StationMode,
    Hostname(String),
    Connect { ssid: String, password: String },
    Disconnect,
}

/// Radio whose status follows a script, one entry per `status` query
///
/// Once the script runs out the last entry repeats.
#[derive(Debug)]
pub struct ScriptedRadio {
    pub ops: Vec<RadioOp>,
    pub script: Vec<LinkStatus>,
    pub queries: core::cell::Cell<usize>,
    pub address: Ipv4Addr,
}

impl ScriptedRadio {
    pub fn new(script: Vec<LinkStatus>) -> Self {
        Self {
            ops: Vec::new(),
            script,
            queries: core::cell::Cell::new(0),
            address: Ipv4Addr::new(192, 168, 1, 42),
        }
    }

    /// Never connects
    pub fn unreachable() -> Self {
        Self::new(vec![LinkStatus::Connecting])
    }

    /// Reports `Connecting` for `pending` queries, then `Connected`
    pub fn connects_after(pending: usize) -> Self {
        let mut script = vec![LinkStatus::Connecting; pending];
        script.push(LinkStatus::Connected);
        Self::new(script)
    }

    pub fn connect_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, RadioOp::Connect { .. }))
            .count()
    }

    pub fn disconnect_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, RadioOp::Disconnect))
            .count()
    }
}

impl WifiRadio for ScriptedRadio {
    fn start_station_mode(&mut self) -> Result<(), RadioError> {
        self.ops.push(RadioOp::StationMode);
        Ok(())
    }

    fn set_hostname(&mut self, hostname: &str) -> Result<(), RadioError> {
        self.ops.push(RadioOp::Hostname(hostname.into()));
        Ok(())
    }

    fn begin_connect(&mut self, ssid: &str, password: &str) -> Result<(), RadioError> {
        self.ops.push(RadioOp::Connect {
            ssid: ssid.into(),
            password: password.into(),
        });
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), RadioError> {
        self.ops.push(RadioOp::Disconnect);
        Ok(())
    }

    fn status(&self) -> LinkStatus {
        let index = self.queries.get();
        self.queries.set(index + 1);
        self.script
            .get(index)
            .or_else(|| self.script.last())
            .copied()
            .unwrap_or(LinkStatus::Idle)
    }

    fn local_address(&self) -> Option<Ipv4Addr> {
        Some(self.address)
    }
}
