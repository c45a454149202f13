//! Offline decoder for critical-FPGA telemetry captures.
//!
//! A capture is the text dump of the protection/regulation controller's debug
//! port: fixed-size frames of hex characters separated by the sync word `AAFF`.
//! This library splits a capture into frames, validates their size, restores the
//! byte order the layout is defined over and decodes every field of the critical
//! region.
//!
//! # Example
//!
//! ```no_run
//! use cfnf_decoder::CaptureDecoder;
//!
//! // Decode in memory (the capture file is memory-mapped)
//! let records = CaptureDecoder::from_file("capture.txt")?;
//! for record in &records {
//!     println!("{:?}", record.get("cycle_period"));
//! }
//!
//! // Or write one file per field plus the aggregated log
//! let stats = CaptureDecoder::decode_to_dir("capture.txt", "capture", &Default::default())?;
//! println!("{} frames decoded", stats.accepted);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Frame layout
//!
//! A frame is 122 bytes (244 hex characters), transmitted last byte first. After
//! reversal the first 58 bytes form the critical region and the last 64 bytes the
//! paged region, which is kept as raw characters and never decoded.
//!
//! | Kind | Rendering |
//! |------|-----------|
//! | unsigned | big-endian unsigned integer in decimal |
//! | hex | source characters of the capture, unchanged |
//! | binary | base 2, zero-padded to the field width |
//! | masked-12 | low 12 bits of a 16-bit word in decimal |
//! | signed 32 | two's-complement 32-bit integer in decimal |
//!
//! # Output
//!
//! One `<field>.txt` per descriptor, `dim_a_1_ana.txt` with the four masked
//! analog channels tab-separated, and `log.txt` with one labeled block per frame.
//! Every file gets exactly one line (or block) per accepted frame, in capture order.

pub mod capture;
pub mod converter;
pub mod dataframe;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod layout;
pub mod sink;
pub mod types;

pub use converter::{CaptureConverter, DecodeOptions, DecodeStats};
pub use decoder::DecodedRecord;
pub use error::{DecodeError, Result};
pub use polars::prelude::DataFrame;

use sink::SinkRegistry;
use std::fs::File;
use std::path::Path;

/// Main entry point for decoding capture files.
pub struct CaptureDecoder;

impl CaptureDecoder {
    /// Decodes a capture held in memory with default options.
    pub fn from_bytes(data: &[u8]) -> Result<Vec<DecodedRecord>> {
        let (records, _) = CaptureConverter::decode_all(data, &DecodeOptions::default())?;
        Ok(records)
    }

    /// Decodes a capture file with default options.
    ///
    /// The file is memory-mapped rather than read into a buffer.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<DecodedRecord>> {
        with_capture(path.as_ref(), Self::from_bytes)
    }

    /// Decodes a capture file and writes every sink into `out_dir`.
    ///
    /// The directory is created if needed; existing sink files are truncated.
    pub fn decode_to_dir<P, Q>(input: P, out_dir: Q, options: &DecodeOptions) -> Result<DecodeStats>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        with_capture(input.as_ref(), |data| {
            let mut sinks = SinkRegistry::create_in(out_dir.as_ref())?;
            let stats = CaptureConverter::run(data, &mut sinks, options)?;
            sinks.finish()?;
            Ok(stats)
        })
    }

    /// Decodes a capture file into a DataFrame, one row per accepted frame.
    pub fn to_dataframe<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<DataFrame> {
        with_capture(path.as_ref(), |data| {
            let (records, _) = CaptureConverter::decode_all(data, options)?;
            dataframe::records_to_dataframe(&records)
        })
    }
}

/// Maps a capture file into memory and hands its bytes to `f`.
pub fn with_capture<T, F>(path: &Path, f: F) -> Result<T>
where
    F: FnOnce(&[u8]) -> Result<T>,
{
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return f(&[]);
    }
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    f(&mmap)
}
