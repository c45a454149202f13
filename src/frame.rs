//! Frame byte handling.
//!
//! Frames arrive with their bytes in transmission order, last field first. The
//! layout is defined over the reversed sequence, so every accepted frame is
//! reversed as a whole before fields are extracted.
//!
//! Only the critical region must be valid hex. The paged region is kept as the
//! raw characters of the capture.

use crate::capture::{CandidateFrame, FRAME_HEX_LEN};
use crate::error::{DecodeError, Result};
use crate::layout::{FieldDescriptor, CRITICAL_LEN, PAGED_LEN};

/// Reverses the byte order of a buffer: `out[k] == data[data.len() - 1 - k]`.
///
/// This is a full reversal, not a pairwise swap, and it is its own inverse.
pub fn reverse_byte_order(data: &[u8]) -> Vec<u8> {
    data.iter().rev().copied().collect()
}

/// Reverses the order of the two-character byte tokens of hex text.
///
/// The characters of each token keep their order and case.
pub fn reverse_hex_tokens(text: &[u8]) -> Vec<u8> {
    text.chunks(2).rev().flatten().copied().collect()
}

/// A frame in layout order, split into its critical and paged regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFrame {
    pub index: usize,
    critical: [u8; CRITICAL_LEN],
    /// Source characters of the critical region, in layout order.
    critical_text: Vec<u8>,
    /// Source characters of the paged region, in layout order.
    paged_text: Vec<u8>,
}

impl NormalizedFrame {
    /// Validates a candidate frame and reverses it into layout order.
    ///
    /// Fails if the candidate does not have the fixed frame size or if the
    /// critical region contains a non-hex character, in which case nothing of
    /// the frame is kept.
    pub fn from_candidate(candidate: &CandidateFrame<'_>) -> Result<Self> {
        if !candidate.is_decodable() {
            return Err(DecodeError::InvalidFrame {
                index: candidate.index,
                expected: FRAME_HEX_LEN,
                actual: candidate.len(),
            });
        }

        // The critical region is transmitted last
        let (paged_raw, critical_raw) = candidate.text.split_at(PAGED_LEN * 2);

        let mut transmitted = [0u8; CRITICAL_LEN];
        hex::decode_to_slice(critical_raw, &mut transmitted).map_err(|source| {
            DecodeError::InvalidHex {
                index: candidate.index,
                source,
            }
        })?;

        let mut critical = [0u8; CRITICAL_LEN];
        critical.copy_from_slice(&reverse_byte_order(&transmitted));

        Ok(Self {
            index: candidate.index,
            critical,
            critical_text: reverse_hex_tokens(critical_raw),
            paged_text: reverse_hex_tokens(paged_raw),
        })
    }

    /// Bytes of the critical region.
    pub fn critical(&self) -> &[u8] {
        &self.critical
    }

    /// Characters of the paged region in layout order. Reserved; never decoded.
    pub fn paged(&self) -> &[u8] {
        &self.paged_text
    }

    /// Bytes of a single critical-region field.
    pub fn field_bytes(&self, field: &FieldDescriptor) -> &[u8] {
        &self.critical[field.range()]
    }

    /// Source characters of a single critical-region field, two per byte.
    pub fn field_text(&self, field: &FieldDescriptor) -> &[u8] {
        &self.critical_text[field.start * 2..field.end * 2]
    }
}
