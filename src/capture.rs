//! Capture splitting and frame validation.
//!
//! A capture is the raw text dump of the controller's debug port: hex characters
//! with the sync word `AAFF` between frames. This module provides:
//! - Splitting the capture on the sync word (the sync word itself is discarded)
//! - Length validation of candidate frames

use std::borrow::Cow;

/// Sync word separating frames in a capture.
pub const FRAME_DELIMITER: &[u8] = b"AAFF";

/// Number of bytes in one frame.
pub const FRAME_LEN: usize = 122;

/// Number of hex characters in one frame.
pub const FRAME_HEX_LEN: usize = FRAME_LEN * 2;

/// A segment of the capture found between two sync words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateFrame<'a> {
    /// Position of the segment in the capture, starting at 0.
    pub index: usize,
    pub text: &'a [u8],
}

impl<'a> CandidateFrame<'a> {
    /// Returns true if the segment has exactly the frame size.
    pub fn is_decodable(&self) -> bool {
        self.text.len() == FRAME_HEX_LEN
    }

    /// Returns true if the segment holds no characters at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }
}

/// Reader over a fully loaded capture.
pub struct CaptureReader<'a> {
    data: Cow<'a, [u8]>,
}

impl<'a> CaptureReader<'a> {
    /// Creates a new CaptureReader borrowing the capture bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data: Cow::Borrowed(data),
        }
    }

    /// Removes CR and LF bytes from the capture before it is split.
    ///
    /// Captures saved with line wrapping otherwise lose every frame that spans
    /// a line break. Off by default.
    pub fn with_line_breaks_stripped(self, strip: bool) -> Self {
        if !strip || !self.data.iter().any(|b| matches!(b, b'\r' | b'\n')) {
            return self;
        }
        let stripped: Vec<u8> = self
            .data
            .iter()
            .copied()
            .filter(|b| !matches!(b, b'\r' | b'\n'))
            .collect();
        Self {
            data: Cow::Owned(stripped),
        }
    }

    /// Returns an iterator over all segments of the capture, in capture order.
    ///
    /// Splitting follows leftmost, non-overlapping matches of the sync word, so a
    /// capture with `n` sync words always yields `n + 1` segments.
    pub fn segments(&self) -> SegmentIterator<'_> {
        SegmentIterator {
            data: &self.data,
            pos: Some(0),
            index: 0,
        }
    }

    /// Returns an iterator over segments that pass length validation.
    pub fn frames(&self) -> impl Iterator<Item = CandidateFrame<'_>> {
        self.segments().filter(|frame| frame.is_decodable())
    }
}

/// Iterator over capture segments.
pub struct SegmentIterator<'a> {
    data: &'a [u8],
    pos: Option<usize>,
    index: usize,
}

impl<'a> Iterator for SegmentIterator<'a> {
    type Item = CandidateFrame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.pos?;
        let rest = &self.data[pos..];

        let text = match find_delimiter(rest) {
            Some(offset) => {
                self.pos = Some(pos + offset + FRAME_DELIMITER.len());
                &rest[..offset]
            }
            None => {
                self.pos = None;
                rest
            }
        };

        let frame = CandidateFrame {
            index: self.index,
            text,
        };
        self.index += 1;
        Some(frame)
    }
}

/// Finds the first occurrence of the sync word.
fn find_delimiter(data: &[u8]) -> Option<usize> {
    data.windows(FRAME_DELIMITER.len())
        .position(|window| window == FRAME_DELIMITER)
}
