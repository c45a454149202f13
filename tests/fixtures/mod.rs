//! Test fixtures for integration tests
//!
//! Frames are described in layout order (the order after byte reversal) and
//! encoded the way the controller transmits them.

#![allow(dead_code)]

use cfnf_decoder::capture::{FRAME_DELIMITER, FRAME_LEN};
use cfnf_decoder::layout::{descriptor, CRITICAL_LEN};

/// Builds one frame from layout-ordered bytes.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    bytes: [u8; FRAME_LEN],
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuilder {
    /// All-zero critical region, paged byte `k` set to `k`.
    pub fn new() -> Self {
        let mut bytes = [0u8; FRAME_LEN];
        for (k, byte) in bytes[CRITICAL_LEN..].iter_mut().enumerate() {
            *byte = k as u8;
        }
        Self { bytes }
    }

    /// Sets the bytes of a named field, most significant first.
    pub fn field(mut self, name: &str, value: &[u8]) -> Self {
        let field = descriptor(name).unwrap_or_else(|| panic!("unknown field {}", name));
        assert_eq!(field.width(), value.len(), "wrong width for {}", name);
        self.bytes[field.range()].copy_from_slice(value);
        self
    }

    /// Encodes the frame as transmitted: bytes reversed, upper-case hex.
    pub fn encode(&self) -> String {
        let reversed: Vec<u8> = self.bytes.iter().rev().copied().collect();
        let text = hex::encode_upper(reversed);
        assert!(
            !text.contains(std::str::from_utf8(FRAME_DELIMITER).unwrap()),
            "fixture frame contains the sync word"
        );
        text
    }
}

/// A frame exercising every decode kind, including the signed boundaries.
pub fn sample_frame() -> FrameBuilder {
    FrameBuilder::new()
        .field("debug_seq_cnt", &[0x01, 0x02])
        .field("serial_data", &[0x12, 0x34, 0x56])
        .field("backplane_type", &[0x05])
        .field("controller_status", &[0x80, 0x01])
        .field("seu_count", &[0x07])
        .field("converter_output", &[0x3C])
        .field("converter_input", &[0x00, 0x0F])
        .field("dim_log_index", &[0x00, 0x10])
        .field("adc_log_index", &[0x01, 0x00])
        .field("version", &[0x02, 0x01])
        .field("cycle_period", &[0x00, 0x01, 0x86, 0xA0])
        .field("dim_a_1_ana_3", &[0x1F, 0xFF])
        .field("dim_a_1_ana_2", &[0x08, 0x00])
        .field("dim_a_1_ana_1", &[0x00, 0x01])
        .field("dim_a_1_ana_0", &[0xF1, 0x23])
        .field("dim_a_trig_unl", &[0x00, 0x00])
        .field("dim_a_trig_lat", &[0xFF, 0xFF])
        .field("i_b_10_19", &[0x7F, 0xFF, 0xFF, 0xFF])
        .field("i_b_0_9", &[0x80, 0x00, 0x00, 0x00])
        .field("i_a_10_19", &[0xFF, 0xFF, 0xFF, 0xFF])
        .field("i_a_0_9", &[0x00, 0x00, 0x00, 0x00])
        .field("v_meas_10_19", &[0xFF, 0xFF, 0xFF, 0x85])
        .field("v_meas_0_9", &[0x00, 0x00, 0x04, 0xD2])
}

/// Expected per-field text of `sample_frame()`.
pub const SAMPLE_VALUES: [(&str, &str); 23] = [
    ("debug_seq_cnt", "258"),
    ("serial_data", "123456"),
    ("backplane_type", "00000101"),
    ("controller_status", "1000000000000001"),
    ("seu_count", "7"),
    ("converter_output", "00111100"),
    ("converter_input", "0000000000001111"),
    ("dim_log_index", "16"),
    ("adc_log_index", "256"),
    ("version", "0000001000000001"),
    ("cycle_period", "100000"),
    ("dim_a_1_ana_3", "4095"),
    ("dim_a_1_ana_2", "2048"),
    ("dim_a_1_ana_1", "1"),
    ("dim_a_1_ana_0", "291"),
    ("dim_a_trig_unl", "0000000000000000"),
    ("dim_a_trig_lat", "1111111111111111"),
    ("i_b_10_19", "2147483647"),
    ("i_b_0_9", "-2147483648"),
    ("i_a_10_19", "-1"),
    ("i_a_0_9", "0"),
    ("v_meas_10_19", "-123"),
    ("v_meas_0_9", "1234"),
];

/// Joins frames into a capture, each preceded by the sync word.
pub fn capture_of(frames: &[String]) -> String {
    let sync = std::str::from_utf8(FRAME_DELIMITER).unwrap();
    frames.iter().map(|f| format!("{}{}", sync, f)).collect()
}
