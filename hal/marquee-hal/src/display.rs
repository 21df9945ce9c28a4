//! LED matrix display abstraction
//!
//! A display is a chain of identical panels ("segments") that share a bus.
//! Exactly one segment is the render target at a time; drawing goes to that
//! segment's frame buffer and only reaches the LEDs on [`MatrixDisplay::flush`].

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Segment index outside the panel chain
    InvalidSegment,
    /// Bus / GPIO failure while talking to a panel
    Communication,
    /// Panel chain was not initialized with `begin`
    NotInitialized,
}

/// Multi-segment LED matrix display
pub trait MatrixDisplay {
    /// Initialize every panel in the chain
    fn begin(&mut self) -> Result<(), DisplayError>;

    /// Make `segment` the target for subsequent clear/draw/flush calls
    fn select_segment(&mut self, segment: u8) -> Result<(), DisplayError>;

    /// Clear the active segment's frame buffer
    fn clear(&mut self);

    /// Draw text into the active segment's frame buffer
    ///
    /// `x` is the column of the first glyph relative to the segment's left
    /// edge and may be negative or past the right edge; pixels that fall
    /// outside the segment are clipped.
    fn draw_text(&mut self, text: &str, x: i32, y: i32);

    /// Push the active segment's frame buffer to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Rendered width of `text` in pixels under the display font
    fn text_width(&self, text: &str) -> u16;

    /// Number of segments in the chain
    fn segment_count(&self) -> u8;

    /// Width of one segment in pixels
    fn segment_width(&self) -> u16;
}
