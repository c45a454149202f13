//! Output sinks for decoded records.
//!
//! Every decoded frame produces one line in each per-field sink, one line in the
//! combined analog sink and one labeled block in the aggregated log. All lines
//! of a frame are rendered before anything is written, so the k-th line of each
//! sink always belongs to the same frame.

use crate::decoder::DecodedRecord;
use crate::error::{DecodeError, Result};
use crate::layout::{log_order, ANALOG_GROUP, ANALOG_GROUP_NAME, CRITICAL_FIELDS};
use crate::types::FieldValue;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the aggregated log sink.
pub const LOG_SINK_NAME: &str = "log";

/// Extension of every sink file.
pub const SINK_EXTENSION: &str = "txt";

const LOG_DIVIDER: &str =
    "--------------------------------------------------------------------------------";

/// Derives the output directory for a capture: the input path without its extension.
///
/// Inputs without an extension get an `_out` suffix so the directory never
/// collides with the capture file itself.
pub fn output_dir_for(input: &Path) -> PathBuf {
    if input.extension().is_some() {
        input.with_extension("")
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push("_out");
        PathBuf::from(name)
    }
}

/// Registry of named, write-only output streams.
pub struct SinkRegistry<W: Write> {
    fields: Vec<(&'static str, W)>,
    analog: W,
    log: W,
    rows: usize,
}

impl SinkRegistry<BufWriter<File>> {
    /// Creates the output directory and one buffered file per sink inside it.
    ///
    /// Existing files are truncated.
    pub fn create_in(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Self::from_factory(|name| {
            let path = dir.join(format!("{}.{}", name, SINK_EXTENSION));
            Ok(BufWriter::new(File::create(path)?))
        })
    }
}

impl<W: Write> SinkRegistry<W> {
    /// Builds a registry by opening one writer per sink name.
    pub fn from_factory<F>(mut open: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<W>,
    {
        let fields = CRITICAL_FIELDS
            .iter()
            .map(|field| open(field.name).map(|writer| (field.name, writer)))
            .collect::<Result<Vec<_>>>()?;
        let analog = open(ANALOG_GROUP_NAME)?;
        let log = open(LOG_SINK_NAME)?;

        Ok(Self {
            fields,
            analog,
            log,
            rows: 0,
        })
    }

    /// Number of frames written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Gets a sink by name: a field name, `dim_a_1_ana` or `log`.
    pub fn sink(&self, name: &str) -> Option<&W> {
        match name {
            ANALOG_GROUP_NAME => Some(&self.analog),
            LOG_SINK_NAME => Some(&self.log),
            _ => self
                .fields
                .iter()
                .find(|(field, _)| *field == name)
                .map(|(_, writer)| writer),
        }
    }

    /// Writes one decoded frame to every sink.
    pub fn write_record(&mut self, record: &DecodedRecord) -> Result<()> {
        let lines = self
            .fields
            .iter()
            .map(|(name, _)| lookup(record, name).map(|value| format!("{}\n", value)))
            .collect::<Result<Vec<_>>>()?;
        let analog = render_analog_line(record)?;
        let block = render_log_block(record)?;

        for ((_, writer), line) in self.fields.iter_mut().zip(&lines) {
            writer.write_all(line.as_bytes())?;
        }
        self.analog.write_all(analog.as_bytes())?;
        self.log.write_all(block.as_bytes())?;

        self.rows += 1;
        Ok(())
    }

    /// Flushes every sink.
    pub fn flush(&mut self) -> Result<()> {
        for (_, writer) in &mut self.fields {
            writer.flush()?;
        }
        self.analog.flush()?;
        self.log.flush()?;
        Ok(())
    }

    /// Flushes and closes every sink.
    pub fn finish(mut self) -> Result<()> {
        self.flush()
    }
}

fn lookup<'r>(record: &'r DecodedRecord, name: &str) -> Result<&'r FieldValue> {
    record.get(name).ok_or_else(|| {
        DecodeError::Layout(format!(
            "Field '{}' missing from frame {}",
            name, record.frame_index
        ))
    })
}

/// Renders the four masked analog channels as one tab-separated line.
pub fn render_analog_line(record: &DecodedRecord) -> Result<String> {
    let values = ANALOG_GROUP
        .iter()
        .map(|name| lookup(record, name).map(ToString::to_string))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("{}\n", values.join("\t")))
}

/// Renders the aggregated log block of one frame, divider included.
pub fn render_log_block(record: &DecodedRecord) -> Result<String> {
    let mut block = String::new();
    for field in log_order() {
        let value = lookup(record, field.name)?;
        // Writing to a String cannot fail
        let _ = writeln!(block, "{:<15}:\t{} ({})", field.label, value, value.kind_tag());
    }
    block.push_str(LOG_DIVIDER);
    block.push('\n');
    Ok(block)
}
