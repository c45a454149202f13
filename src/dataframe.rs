//! Tabular export of decoded records.
//!
//! One row per accepted frame: a `frame` column holding the segment index,
//! then one column per descriptor in table order.

use crate::decoder::{DecodedRecord, RecordDecoder};
use crate::error::Result;
use crate::types::{column_dtype, FieldValue};
use polars::prelude::*;

/// Name of the column holding each row's segment index.
pub const FRAME_COLUMN: &str = "frame";

/// Builds a DataFrame from decoded records.
pub fn records_to_dataframe(records: &[DecodedRecord]) -> Result<DataFrame> {
    let fields = RecordDecoder::new().fields();
    let mut columns: Vec<Column> = Vec::with_capacity(fields.len() + 1);

    let frames: Vec<u64> = records.iter().map(|r| r.frame_index as u64).collect();
    columns.push(Series::new(FRAME_COLUMN.into(), frames).into());

    for field in fields {
        let series = match column_dtype(field.kind) {
            DataType::UInt64 => {
                let values: Vec<Option<u64>> = records
                    .iter()
                    .map(|r| r.get(field.name).and_then(FieldValue::as_unsigned))
                    .collect();
                Series::new(field.name.into(), values)
            }
            DataType::Int64 => {
                let values: Vec<Option<i64>> = records
                    .iter()
                    .map(|r| r.get(field.name).and_then(FieldValue::as_signed))
                    .collect();
                Series::new(field.name.into(), values)
            }
            _ => {
                let values: Vec<Option<String>> = records
                    .iter()
                    .map(|r| r.get(field.name).map(ToString::to_string))
                    .collect();
                Series::new(field.name.into(), values)
            }
        };
        columns.push(series.into());
    }

    Ok(DataFrame::new(columns)?)
}
