//! Shared message state
//!
//! The message is the only state shared between the text update endpoint
//! (writer) and the scroll engine (reader). It is owned by the application
//! and lent out by `&mut`, so every update is atomic with respect to a
//! render tick.

use core::fmt;
use core::ops::Deref;

use heapless::String;

/// Message buffer capacity in bytes, terminator included
pub const MESSAGE_CAPACITY: usize = 255;

/// Longest accepted message in bytes
pub const MAX_TEXT_LEN: usize = MESSAGE_CAPACITY - 1;

/// Text did not fit the message buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextTooLong {
    /// Length of the rejected text in bytes
    pub len: usize,
}

/// Bounded message text
///
/// Construction fails for anything of `MESSAGE_CAPACITY` bytes or more, so
/// the length limit cannot be bypassed after the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageText(String<MAX_TEXT_LEN>);

impl MessageText {
    /// Create message text, rejecting anything of `MESSAGE_CAPACITY` bytes or more
    pub fn new(text: &str) -> Result<Self, TextTooLong> {
        let mut inner = String::new();
        inner
            .push_str(text)
            .map_err(|_| TextTooLong { len: text.len() })?;
        Ok(Self(inner))
    }

    /// Borrow as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for MessageText {
    type Target = str;

    fn deref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl TryFrom<&str> for MessageText {
    type Error = TextTooLong;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

/// Text being scrolled plus its scroll state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    text: MessageText,
    /// Rendered width of `text` in pixels
    pixel_width: u16,
    /// Columns scrolled so far in the current cycle
    scroll_offset: u32,
}

impl Message {
    /// Create a message whose width was measured with the active font
    pub fn new(text: MessageText, pixel_width: u16) -> Self {
        Self {
            text,
            pixel_width,
            scroll_offset: 0,
        }
    }

    /// Current text
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Rendered width of the text in pixels
    pub fn pixel_width(&self) -> u16 {
        self.pixel_width
    }

    /// Current scroll offset
    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    /// Replace the text and restart scrolling from the right edge
    pub fn replace(&mut self, text: MessageText, pixel_width: u16) {
        self.text = text;
        self.pixel_width = pixel_width;
        self.scroll_offset = 0;
    }

    /// Advance the scroll offset by one column, wrapping at `cycle_len`
    ///
    /// `cycle_len` of zero leaves the offset at zero.
    pub fn advance(&mut self, cycle_len: u32) {
        self.scroll_offset = match cycle_len {
            0 => 0,
            len => (self.scroll_offset + 1) % len,
        };
    }
}
