//! Fixed frame layout.
//!
//! This module provides:
//! - `DecodeKind`: how the bytes of a field are interpreted
//! - `FieldDescriptor`: a named byte range of the critical region
//! - `CRITICAL_FIELDS`: the descriptor table for the critical region
//!
//! Offsets are relative to the byte-order-normalized frame.

use std::ops::Range;

/// Number of bytes in the critical region, at the start of a normalized frame.
pub const CRITICAL_LEN: usize = 58;

/// Number of bytes in the paged region, at the end of a normalized frame.
pub const PAGED_LEN: usize = 64;

/// Name of the combined sink holding the four masked analog channels.
pub const ANALOG_GROUP_NAME: &str = "dim_a_1_ana";

/// Decode rule applied to the bytes of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeKind {
    /// Unsigned big-endian integer rendered in decimal.
    UnsignedInt,
    /// Raw bytes rendered as hex text.
    HexPassthrough,
    /// Unsigned integer rendered in base 2, zero-padded to `width` digits.
    Binary { width: u8 },
    /// 16-bit word of which only the low 12 bits are meaningful.
    Masked12,
    /// Two's-complement signed 32-bit integer.
    Signed32,
}

impl DecodeKind {
    /// Returns true if a field of `len` bytes can be decoded with this kind.
    pub fn accepts_len(&self, len: usize) -> bool {
        match self {
            DecodeKind::UnsignedInt => (1..=8).contains(&len),
            DecodeKind::HexPassthrough => len > 0,
            DecodeKind::Binary { width } => len * 8 == *width as usize,
            DecodeKind::Masked12 => len == 2,
            DecodeKind::Signed32 => len == 4,
        }
    }
}

/// A named byte range within the critical region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name, also the name of its output sink.
    pub name: &'static str,
    /// Label used in the aggregated log.
    pub label: &'static str,
    pub start: usize,
    pub end: usize,
    pub kind: DecodeKind,
}

impl FieldDescriptor {
    const fn new(
        name: &'static str,
        label: &'static str,
        start: usize,
        end: usize,
        kind: DecodeKind,
    ) -> Self {
        Self {
            name,
            label,
            start,
            end,
            kind,
        }
    }

    /// Byte range of the field, end-exclusive.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Width of the field in bytes.
    pub fn width(&self) -> usize {
        self.end - self.start
    }
}

const BIN8: DecodeKind = DecodeKind::Binary { width: 8 };
const BIN16: DecodeKind = DecodeKind::Binary { width: 16 };

/// Descriptor table of the critical region, in byte order.
pub static CRITICAL_FIELDS: [FieldDescriptor; 23] = [
    FieldDescriptor::new("debug_seq_cnt", "DEBUG_SEQUENCE", 0, 2, DecodeKind::UnsignedInt),
    FieldDescriptor::new("serial_data", "SERIAL_DATA", 2, 5, DecodeKind::HexPassthrough),
    FieldDescriptor::new("backplane_type", "BACKPLANE_TYPE", 5, 6, BIN8),
    FieldDescriptor::new("controller_status", "FGC_STATUS", 6, 8, BIN16),
    FieldDescriptor::new("seu_count", "SEU_COUNT", 8, 9, DecodeKind::UnsignedInt),
    FieldDescriptor::new("converter_output", "CONVERTER_OUT", 9, 10, BIN8),
    FieldDescriptor::new("converter_input", "CONVERTER_IN", 10, 12, BIN16),
    FieldDescriptor::new("dim_log_index", "DIM_LOG_INDEX", 12, 14, DecodeKind::UnsignedInt),
    FieldDescriptor::new("adc_log_index", "ADC_LOG_INDEX", 14, 16, DecodeKind::UnsignedInt),
    FieldDescriptor::new("version", "VERSION", 16, 18, BIN16),
    FieldDescriptor::new("cycle_period", "CYCLE_PERIOD", 18, 22, DecodeKind::UnsignedInt),
    FieldDescriptor::new("dim_a_1_ana_3", "DIM_A_1_ANA_3", 22, 24, DecodeKind::Masked12),
    FieldDescriptor::new("dim_a_1_ana_2", "DIM_A_1_ANA_2", 24, 26, DecodeKind::Masked12),
    FieldDescriptor::new("dim_a_1_ana_1", "DIM_A_1_ANA_1", 26, 28, DecodeKind::Masked12),
    FieldDescriptor::new("dim_a_1_ana_0", "DIM_A_1_ANA_0", 28, 30, DecodeKind::Masked12),
    FieldDescriptor::new("dim_a_trig_unl", "DIM_A_TRIG_UNL", 30, 32, BIN16),
    FieldDescriptor::new("dim_a_trig_lat", "DIM_A_TRIG_LAT", 32, 34, BIN16),
    FieldDescriptor::new("i_b_10_19", "I_B_10_19", 34, 38, DecodeKind::Signed32),
    FieldDescriptor::new("i_b_0_9", "I_B_0_9", 38, 42, DecodeKind::Signed32),
    FieldDescriptor::new("i_a_10_19", "I_A_10_19", 42, 46, DecodeKind::Signed32),
    FieldDescriptor::new("i_a_0_9", "I_A_0_9", 46, 50, DecodeKind::Signed32),
    FieldDescriptor::new("v_meas_10_19", "V_MEAS_10_19", 50, 54, DecodeKind::Signed32),
    FieldDescriptor::new("v_meas_0_9", "V_MEAS_0_9", 54, 58, DecodeKind::Signed32),
];

/// Masked analog channels written together to the combined sink, in column order.
pub const ANALOG_GROUP: [&str; 4] = [
    "dim_a_1_ana_0",
    "dim_a_1_ana_1",
    "dim_a_1_ana_2",
    "dim_a_1_ana_3",
];

/// Looks up a descriptor by field name.
pub fn descriptor(name: &str) -> Option<&'static FieldDescriptor> {
    CRITICAL_FIELDS.iter().find(|d| d.name == name)
}

/// Descriptors in the order the aggregated log prints them.
///
/// The log walks the critical region from its last field to its first.
pub fn log_order() -> impl Iterator<Item = &'static FieldDescriptor> {
    CRITICAL_FIELDS.iter().rev()
}
