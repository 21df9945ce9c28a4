//! Render surface adapter
//!
//! Thin wrapper over a [`MatrixDisplay`] that turns "show this text at this
//! column on segment N" into the select / clear / draw / flush sequence the
//! panels need.

use marquee_hal::{DisplayError, MatrixDisplay};

/// Row the single text line is drawn at
const TEXT_ROW: i32 = 0;

/// Rendering errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// The underlying display reported an error
    Display(DisplayError),
}

impl From<DisplayError> for RenderError {
    fn from(e: DisplayError) -> Self {
        RenderError::Display(e)
    }
}

/// Render surface over a multi-segment display
pub struct RenderSurface<D> {
    display: D,
}

impl<D: MatrixDisplay> RenderSurface<D> {
    /// Wrap a display
    pub fn new(display: D) -> Self {
        Self { display }
    }

    /// Initialize the panel chain
    pub fn begin(&mut self) -> Result<(), RenderError> {
        self.display.begin()?;
        Ok(())
    }

    /// Render one segment's frame with `text` starting at column `x`
    pub fn render_segment(&mut self, segment: u8, text: &str, x: i32) -> Result<(), RenderError> {
        self.display.select_segment(segment)?;
        self.display.clear();
        self.display.draw_text(text, x, TEXT_ROW);
        self.display.flush()?;
        Ok(())
    }

    /// Rendered width of `text` in pixels
    pub fn measure(&self, text: &str) -> u16 {
        self.display.text_width(text)
    }

    /// Number of segments in the chain
    pub fn segments(&self) -> u8 {
        self.display.segment_count()
    }

    /// Width of one segment in pixels
    pub fn segment_width(&self) -> u16 {
        self.display.segment_width()
    }

    /// Get access to the underlying display
    pub fn display(&self) -> &D {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{DisplayOp, MockDisplay};

    #[test]
    fn test_render_segment_sequence() {
        let mut surface = RenderSurface::new(MockDisplay::new(4, 32));
        surface.render_segment(2, "Hi", -3).unwrap();

        assert_eq!(
            surface.display().ops,
            vec![
                DisplayOp::Select(2),
                DisplayOp::Clear,
                DisplayOp::Draw {
                    text: "Hi".into(),
                    x: -3,
                    y: 0
                },
                DisplayOp::Flush,
            ]
        );
    }

    #[test]
    fn test_invalid_segment_propagates() {
        let mut surface = RenderSurface::new(MockDisplay::new(2, 32));
        assert_eq!(
            surface.render_segment(5, "x", 0),
            Err(RenderError::Display(DisplayError::InvalidSegment))
        );
        assert!(surface.display().ops.is_empty());
    }

    #[test]
    fn test_flush_error_propagates() {
        let mut display = MockDisplay::new(1, 32);
        display.fail_flush = true;
        let mut surface = RenderSurface::new(display);
        assert_eq!(
            surface.render_segment(0, "x", 0),
            Err(RenderError::Display(DisplayError::Communication))
        );
    }

    #[test]
    fn test_geometry_and_measure() {
        let surface = RenderSurface::new(MockDisplay::new(4, 32));
        assert_eq!(surface.segments(), 4);
        assert_eq!(surface.segment_width(), 32);
        assert_eq!(surface.measure("abc"), 17);
    }
}
