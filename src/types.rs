//! Decoded field values.
//!
//! This module provides:
//! - `FieldValue`: a decoded field, rendered exactly as the output files print it
//! - Mapping from `DecodeKind` to the Polars column type used for tabular export

use crate::layout::DecodeKind;
use polars::prelude::DataType;
use std::fmt;

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Unsigned(u64),
    Signed(i64),
    /// Unsigned value printed in base 2 with exactly `width` digits.
    Bits { value: u64, width: u8 },
    /// Hex text exactly as it appears in the capture.
    Hex(String),
}

impl FieldValue {
    /// Tag shown after the value in the aggregated log.
    pub fn kind_tag(&self) -> &'static str {
        match self {
            FieldValue::Unsigned(_) | FieldValue::Signed(_) => "int",
            FieldValue::Bits { .. } => "bin",
            FieldValue::Hex(_) => "hex",
        }
    }

    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            FieldValue::Unsigned(v) | FieldValue::Bits { value: v, .. } => Some(*v),
            _ => None,
        }
    }

    pub fn as_signed(&self) -> Option<i64> {
        match self {
            FieldValue::Signed(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Unsigned(v) => write!(f, "{}", v),
            FieldValue::Signed(v) => write!(f, "{}", v),
            FieldValue::Bits { value, width } => {
                write!(f, "{:0width$b}", value, width = *width as usize)
            }
            FieldValue::Hex(s) => f.write_str(s),
        }
    }
}

/// Column type used when a field of this kind is exported to a DataFrame.
pub fn column_dtype(kind: DecodeKind) -> DataType {
    match kind {
        DecodeKind::UnsignedInt | DecodeKind::Masked12 => DataType::UInt64,
        DecodeKind::Signed32 => DataType::Int64,
        // Bit patterns keep their zero padding as text
        DecodeKind::Binary { .. } | DecodeKind::HexPassthrough => DataType::String,
    }
}
