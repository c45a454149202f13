//! Capture decoding pipeline.
//!
//! Each segment of the capture goes through, in order:
//! 1. Length validation (wrong-sized segments are dropped and counted)
//! 2. Hex decoding and byte-order normalization
//! 3. Field decoding
//! 4. Output to the sinks
//!
//! Frames are independent; the only cross-frame state is the order of output.

use crate::capture::{CandidateFrame, CaptureReader, FRAME_HEX_LEN};
use crate::decoder::{DecodedRecord, RecordDecoder};
use crate::error::Result;
use crate::sink::SinkRegistry;
use std::io::Write;
use tracing::{debug, info, warn};

/// Options controlling a decode run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Abort the run on the first frame that fails to decode.
    pub strict: bool,
    /// Remove CR/LF from the capture before splitting.
    pub strip_line_breaks: bool,
}

/// Counters collected over one decode run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Segments produced by splitting on the sync word.
    pub segments: usize,
    /// Segments with no characters, such as the one before the first sync word.
    pub empty: usize,
    /// Frames decoded and emitted.
    pub accepted: usize,
    /// Non-empty segments with the wrong length.
    pub rejected_length: usize,
    /// Frames of the right length that failed to decode.
    pub failed_decode: usize,
}

impl DecodeStats {
    /// Non-empty segments that produced no output.
    pub fn dropped(&self) -> usize {
        self.rejected_length + self.failed_decode
    }
}

/// Drives a capture through the decoding pipeline.
pub struct CaptureConverter;

impl CaptureConverter {
    /// Decodes a capture and writes every accepted frame to the sinks.
    pub fn run<W: Write>(
        data: &[u8],
        sinks: &mut SinkRegistry<W>,
        options: &DecodeOptions,
    ) -> Result<DecodeStats> {
        let stats = Self::for_each_record(data, options, |record| sinks.write_record(&record))?;
        sinks.flush()?;
        Ok(stats)
    }

    /// Decodes a capture into memory.
    pub fn decode_all(
        data: &[u8],
        options: &DecodeOptions,
    ) -> Result<(Vec<DecodedRecord>, DecodeStats)> {
        let mut records = Vec::with_capacity(data.len() / FRAME_HEX_LEN);
        let stats = Self::for_each_record(data, options, |record| {
            records.push(record);
            Ok(())
        })?;
        Ok((records, stats))
    }

    /// Decodes a capture only to collect statistics.
    pub fn scan(data: &[u8], options: &DecodeOptions) -> Result<DecodeStats> {
        Self::for_each_record(data, options, |_| Ok(()))
    }

    fn for_each_record<F>(data: &[u8], options: &DecodeOptions, mut emit: F) -> Result<DecodeStats>
    where
        F: FnMut(DecodedRecord) -> Result<()>,
    {
        let reader =
            CaptureReader::new(data).with_line_breaks_stripped(options.strip_line_breaks);
        let decoder = RecordDecoder::new();
        let mut stats = DecodeStats::default();

        for candidate in reader.segments() {
            stats.segments += 1;

            if candidate.is_empty() {
                stats.empty += 1;
                continue;
            }

            if !candidate.is_decodable() {
                stats.rejected_length += 1;
                warn!(
                    frame = candidate.index,
                    len = candidate.len(),
                    expected = FRAME_HEX_LEN,
                    "Dropping segment with unexpected length"
                );
                continue;
            }

            match Self::decode_one(&decoder, &candidate) {
                Ok(record) => {
                    emit(record)?;
                    stats.accepted += 1;
                }
                Err(e) if e.is_frame_error() && !options.strict => {
                    stats.failed_decode += 1;
                    warn!(frame = candidate.index, error = %e, "Skipping undecodable frame");
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            segments = stats.segments,
            accepted = stats.accepted,
            rejected_length = stats.rejected_length,
            failed_decode = stats.failed_decode,
            "Capture decoded"
        );

        Ok(stats)
    }

    fn decode_one(decoder: &RecordDecoder, candidate: &CandidateFrame<'_>) -> Result<DecodedRecord> {
        let record = decoder.decode_candidate(candidate)?;
        debug!(frame = record.frame_index, "Decoded frame");
        Ok(record)
    }
}
