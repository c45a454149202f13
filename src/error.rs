//! Error types for the capture decoder library.

use thiserror::Error;

/// Result type alias for decoder operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors that can occur while decoding a capture.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A candidate frame does not have the fixed frame size
    #[error("Invalid frame {index}: expected {expected} hex characters, got {actual}")]
    InvalidFrame {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// A frame contains characters that are not hexadecimal digits
    #[error("Invalid hex in frame {index}: {source}")]
    InvalidHex {
        index: usize,
        #[source]
        source: hex::FromHexError,
    },

    /// A field's bytes do not fit the width its decode kind requires
    #[error("Layout error: {0}")]
    Layout(String),

    /// I/O error occurred while reading the capture or writing a sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error during DataFrame construction
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl DecodeError {
    /// Returns true if the error only affects a single frame.
    ///
    /// Frame-level errors are skipped by the converter unless strict mode is on.
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self,
            DecodeError::InvalidFrame { .. } | DecodeError::InvalidHex { .. }
        )
    }
}
