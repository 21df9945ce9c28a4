//! Scroll engine
//!
//! Treats the panel chain as one canvas `segments × segment_width` columns
//! wide. Segment 0 is the leftmost panel. At offset 0 the text starts just
//! past the right edge of the chain; each tick moves it one column left.
//! A cycle is `pixel_width + canvas width` ticks, so the text scrolls fully
//! off before reappearing and a blank gap one display-width long separates
//! repetitions.

use marquee_hal::MatrixDisplay;

use crate::message::Message;
use crate::render::{RenderError, RenderSurface};

/// Scroll geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollEngine {
    segments: u8,
    segment_width: u16,
}

impl ScrollEngine {
    /// Create an engine for `segments` panels of `segment_width` columns
    pub const fn new(segments: u8, segment_width: u16) -> Self {
        Self {
            segments,
            segment_width,
        }
    }

    /// Create an engine matching a render surface's geometry
    pub fn for_surface<D: MatrixDisplay>(surface: &RenderSurface<D>) -> Self {
        Self::new(surface.segments(), surface.segment_width())
    }

    /// Width of the whole chain in columns
    pub fn canvas_width(&self) -> u32 {
        self.segments as u32 * self.segment_width as u32
    }

    /// Number of distinct offsets for text of `pixel_width`
    pub fn cycle_len(&self, pixel_width: u16) -> u32 {
        pixel_width as u32 + self.canvas_width()
    }

    /// Column, relative to `segment`'s left edge, where the text starts at `offset`
    pub fn segment_x(&self, segment: u8, offset: u32) -> i32 {
        let right = self.segment_width as i32 * (self.segments as i32 - segment as i32);
        right - offset as i32
    }

    /// Render the current frame on every segment, then advance the offset
    ///
    /// The offset is left untouched when a segment fails to render.
    pub fn tick<D: MatrixDisplay>(
        &self,
        message: &mut Message,
        surface: &mut RenderSurface<D>,
    ) -> Result<(), RenderError> {
        let offset = message.scroll_offset();
        for segment in 0..self.segments {
            surface.render_segment(segment, message.text(), self.segment_x(segment, offset))?;
        }
        message.advance(self.cycle_len(message.pixel_width()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageText;
    use crate::mock::{mock_text_width, DisplayOp, MockDisplay};
    use proptest::prelude::*;

    fn message(text: &str) -> Message {
        Message::new(MessageText::new(text).unwrap(), mock_text_width(text))
    }

    #[test]
    fn test_first_frame_offsets() {
        let engine = ScrollEngine::new(4, 32);
        let mut surface = RenderSurface::new(MockDisplay::new(4, 32));
        let mut msg = message("Hello");

        engine.tick(&mut msg, &mut surface).unwrap();

        assert_eq!(
            surface.display().draws(),
            vec![
                (0, "Hello".to_string(), 128),
                (1, "Hello".to_string(), 96),
                (2, "Hello".to_string(), 64),
                (3, "Hello".to_string(), 32),
            ]
        );
        assert_eq!(msg.scroll_offset(), 1);
    }

    #[test]
    fn test_each_segment_rendered_once_per_tick() {
        let engine = ScrollEngine::new(4, 32);
        let mut surface = RenderSurface::new(MockDisplay::new(4, 32));
        let mut msg = message("abc");

        engine.tick(&mut msg, &mut surface).unwrap();

        let ops = &surface.display().ops;
        let count = |wanted: &DisplayOp| ops.iter().filter(|op| *op == wanted).count();
        assert_eq!(count(&DisplayOp::Clear), 4);
        assert_eq!(count(&DisplayOp::Flush), 4);
        for segment in 0..4 {
            assert_eq!(count(&DisplayOp::Select(segment)), 1);
        }
    }

    #[test]
    fn test_offset_wraps_after_text_leaves() {
        let engine = ScrollEngine::new(2, 8);
        let mut surface = RenderSurface::new(MockDisplay::new(2, 8));
        // 5 px wide text, 16 px canvas
        let mut msg = message("a");

        for _ in 0..20 {
            engine.tick(&mut msg, &mut surface).unwrap();
        }
        assert_eq!(msg.scroll_offset(), 20 % 21);

        engine.tick(&mut msg, &mut surface).unwrap();
        assert_eq!(msg.scroll_offset(), 0);
    }

    #[test]
    fn test_failed_render_keeps_offset() {
        let engine = ScrollEngine::new(4, 32);
        let mut display = MockDisplay::new(4, 32);
        display.fail_flush = true;
        let mut surface = RenderSurface::new(display);
        let mut msg = message("abc");

        assert!(engine.tick(&mut msg, &mut surface).is_err());
        assert_eq!(msg.scroll_offset(), 0);
    }

    #[test]
    fn test_empty_text_still_cycles() {
        let engine = ScrollEngine::new(4, 32);
        let mut surface = RenderSurface::new(MockDisplay::new(4, 32));
        let mut msg = message("");

        for _ in 0..128 {
            engine.tick(&mut msg, &mut surface).unwrap();
        }
        assert_eq!(msg.scroll_offset(), 0);
    }

    proptest! {
        #[test]
        fn prop_cycle_visits_every_offset_once(width in 0u16..400, span in 1u16..48) {
            let engine = ScrollEngine::new(4, span);
            let mut msg = Message::new(MessageText::default(), width);
            let cycle = engine.cycle_len(width);
            prop_assert_eq!(cycle, width as u32 + 4 * span as u32);

            let mut seen = std::collections::HashSet::new();
            for _ in 0..cycle {
                prop_assert!(seen.insert(msg.scroll_offset()));
                msg.advance(cycle);
            }
            prop_assert_eq!(msg.scroll_offset(), 0);
            prop_assert_eq!(seen.len() as u32, cycle);
        }

        #[test]
        fn prop_segment_offset_formula(span in 1u16..64, offset in 0u32..2000, segment in 0u8..4) {
            let engine = ScrollEngine::new(4, span);
            let expected = span as i32 * (4 - segment as i32) - offset as i32;
            prop_assert_eq!(engine.segment_x(segment, offset), expected);
        }
    }
}
