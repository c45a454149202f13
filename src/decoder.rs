//! Field decoding.
//!
//! Turns a normalized frame into a `DecodedRecord` by applying the decode rule
//! of each descriptor to that descriptor's bytes. Multi-byte fields are read
//! big-endian from the normalized sequence. Hex passthrough fields keep the
//! characters of the capture unchanged.

use crate::capture::CandidateFrame;
use crate::error::{DecodeError, Result};
use crate::frame::NormalizedFrame;
use crate::layout::{DecodeKind, FieldDescriptor, CRITICAL_FIELDS};
use crate::types::FieldValue;
use byteorder::{BigEndian, ByteOrder};

const MASK_12: u16 = 0x0FFF;

/// Decodes one field from its bytes and its source characters.
pub fn decode_field(kind: DecodeKind, bytes: &[u8], text: &[u8]) -> Result<FieldValue> {
    if !kind.accepts_len(bytes.len()) {
        return Err(DecodeError::Layout(format!(
            "{:?} cannot decode a {}-byte field",
            kind,
            bytes.len()
        )));
    }

    let value = match kind {
        DecodeKind::UnsignedInt => FieldValue::Unsigned(BigEndian::read_uint(bytes, bytes.len())),
        DecodeKind::HexPassthrough => {
            FieldValue::Hex(String::from_utf8_lossy(text).into_owned())
        }
        DecodeKind::Binary { width } => FieldValue::Bits {
            value: BigEndian::read_uint(bytes, bytes.len()),
            width,
        },
        DecodeKind::Masked12 => FieldValue::Unsigned(u64::from(BigEndian::read_u16(bytes) & MASK_12)),
        DecodeKind::Signed32 => FieldValue::Signed(i64::from(BigEndian::read_i32(bytes))),
    };

    Ok(value)
}

/// One frame's worth of decoded fields, in descriptor table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    /// Index of the source segment in the capture.
    pub frame_index: usize,
    values: Vec<(&'static FieldDescriptor, FieldValue)>,
}

impl DecodedRecord {
    /// Gets a decoded value by field name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(field, _)| field.name == name)
            .map(|(_, value)| value)
    }

    /// Iterates over descriptors and values in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldDescriptor, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Decodes frames against a descriptor table.
#[derive(Debug, Clone, Copy)]
pub struct RecordDecoder {
    fields: &'static [FieldDescriptor],
}

impl Default for RecordDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordDecoder {
    /// Creates a decoder for the critical region table.
    pub fn new() -> Self {
        Self {
            fields: &CRITICAL_FIELDS,
        }
    }

    /// Descriptors this decoder applies, in table order.
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// Decodes every field of a normalized frame.
    ///
    /// Either all fields decode or the whole frame fails.
    pub fn decode(&self, frame: &NormalizedFrame) -> Result<DecodedRecord> {
        let values = self
            .fields
            .iter()
            .map(|field| {
                decode_field(field.kind, frame.field_bytes(field), frame.field_text(field))
                    .map(|value| (field, value))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DecodedRecord {
            frame_index: frame.index,
            values,
        })
    }

    /// Runs validation, normalization and decoding on one candidate frame.
    pub fn decode_candidate(&self, candidate: &CandidateFrame<'_>) -> Result<DecodedRecord> {
        self.decode(&NormalizedFrame::from_candidate(candidate)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::FRAME_LEN;
    use rand::Rng;

    fn field(kind: DecodeKind, bytes: &[u8]) -> Result<FieldValue> {
        decode_field(kind, bytes, hex::encode_upper(bytes).as_bytes())
    }

    fn signed32(raw: u32) -> i64 {
        field(DecodeKind::Signed32, &raw.to_be_bytes())
            .unwrap()
            .as_signed()
            .unwrap()
    }

    fn masked12(raw: u16) -> u64 {
        field(DecodeKind::Masked12, &raw.to_be_bytes())
            .unwrap()
            .as_unsigned()
            .unwrap()
    }

    #[test]
    fn test_signed32_boundaries() {
        assert_eq!(signed32(0x7FFF_FFFF), 2147483647);
        assert_eq!(signed32(0x8000_0000), -2147483648);
        assert_eq!(signed32(0xFFFF_FFFF), -1);
        assert_eq!(signed32(0x0000_0000), 0);
    }

    #[test]
    fn test_signed32_matches_offset_rule() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let raw: u32 = rng.gen();
            let expected = if raw <= 0x7FFF_FFFF {
                i64::from(raw)
            } else {
                i64::from(raw) - 0x1_0000_0000
            };
            assert_eq!(signed32(raw), expected, "raw = {:#010x}", raw);
        }
    }

    #[test]
    fn test_masked12() {
        assert_eq!(masked12(0x1FFF), 4095);
        assert_eq!(masked12(0x0000), 0);
        assert_eq!(masked12(0x0FFF), 4095);
        assert_eq!(masked12(0xF123), 0x123);
    }

    #[test]
    fn test_binary16_round_trips_value() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let raw: u16 = rng.gen();
            let text = field(DecodeKind::Binary { width: 16 }, &raw.to_be_bytes())
                .unwrap()
                .to_string();
            assert_eq!(text.len(), 16);
            assert_eq!(u16::from_str_radix(&text, 2).unwrap(), raw);
        }
    }

    #[test]
    fn test_binary8_padding() {
        let value = field(DecodeKind::Binary { width: 8 }, &[0x01]).unwrap();
        assert_eq!(value.to_string(), "00000001");
    }

    #[test]
    fn test_unsigned_and_hex() {
        let value = field(DecodeKind::UnsignedInt, &[0x00, 0x01, 0x86, 0xA0]).unwrap();
        assert_eq!(value, FieldValue::Unsigned(100_000));

        let value = decode_field(DecodeKind::HexPassthrough, &[0x0a, 0xbc, 0x01], b"0aBc01").unwrap();
        assert_eq!(value.to_string(), "0aBc01");
    }

    #[test]
    fn test_width_mismatch_is_layout_error() {
        let err = field(DecodeKind::Signed32, &[0x00, 0x01]).unwrap_err();
        assert!(matches!(err, DecodeError::Layout(_)));
        assert!(!err.is_frame_error());
    }

    #[test]
    fn test_decode_candidate() {
        // Reversed, so the last two characters become critical bytes 0..2 after normalization
        let mut text = "00".repeat(FRAME_LEN - 2);
        text.push_str("0201");
        let candidate = CandidateFrame {
            index: 1,
            text: text.as_bytes(),
        };

        let record = RecordDecoder::new().decode_candidate(&candidate).unwrap();
        assert_eq!(record.frame_index, 1);
        assert_eq!(record.len(), CRITICAL_FIELDS.len());
        assert_eq!(record.get("debug_seq_cnt"), Some(&FieldValue::Unsigned(0x0102)));
        assert_eq!(record.get("serial_data").unwrap().to_string(), "000000");
        assert_eq!(record.get("paged"), None);
    }

    #[test]
    fn test_lower_case_serial_data_is_unchanged() {
        let text = "ab".repeat(FRAME_LEN);
        let candidate = CandidateFrame {
            index: 1,
            text: text.as_bytes(),
        };

        let record = RecordDecoder::new().decode_candidate(&candidate).unwrap();
        assert_eq!(record.get("serial_data").unwrap().to_string(), "ababab");
        assert_eq!(record.get("seu_count"), Some(&FieldValue::Unsigned(0xAB)));
    }
}
