use std::io::Cursor;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::ipc::reader::FileReader;
use log::{info, warn};

use super::frame::{CellValue, Frame};
use crate::error::ScoreError;

/// A parsed table with more columns than this and fewer rows than
/// [`TRANSPOSE_MAX_ROWS`] is treated as accidentally transposed. Fixed
/// thresholds, not a data-driven detector; they will misfire on legitimately
/// wide, short datasets.
pub const TRANSPOSE_MIN_COLS: usize = 1_000;
pub const TRANSPOSE_MAX_ROWS: usize = 100;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse an uploaded file into a [`Frame`]. Dispatch by extension, no content
/// sniffing.
///
/// Supported formats:
/// * `.csv`            – comma-separated text, header row with column names
/// * `.ftr`/`.feather` – Feather v2 (Arrow IPC file)
///
/// A table that parses to more than 1000 columns and fewer than 100 rows is
/// assumed to have been saved transposed and is corrected: axes swapped, the
/// first resulting row promoted to the header and dropped from the data.
pub fn ingest(bytes: &[u8], filename: &str) -> Result<Frame, ScoreError> {
    let frame = decode(bytes, filename).map_err(|e| ScoreError::parse(filename, e))?;
    info!(
        "parsed '{filename}': {} rows x {} columns",
        frame.n_rows(),
        frame.n_cols()
    );

    if frame.n_cols() > TRANSPOSE_MIN_COLS && frame.n_rows() < TRANSPOSE_MAX_ROWS {
        warn!(
            "'{filename}' looks transposed ({} columns, {} rows), swapping axes",
            frame.n_cols(),
            frame.n_rows()
        );
        let fixed = frame
            .transposed_with_header()
            .context("correcting transposed table")
            .map_err(|e| ScoreError::parse(filename, e))?;
        info!(
            "corrected to {} rows x {} columns",
            fixed.n_rows(),
            fixed.n_cols()
        );
        return Ok(fixed);
    }

    Ok(frame)
}

fn decode(bytes: &[u8], filename: &str) -> Result<Frame> {
    let ext = filename
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => decode_csv(bytes),
        "ftr" | "feather" => decode_feather(bytes),
        other => bail!("unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV decoder
// ---------------------------------------------------------------------------

/// Header row gives the column names; every field is parsed into the
/// narrowest [`CellValue`] type it fits.
fn decode_csv(bytes: &[u8]) -> Result<Frame> {
    let mut reader = csv::Reader::from_reader(bytes);
    let names: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != names.len() {
            bail!(
                "CSV row {row_no} has {} fields, expected {}",
                record.len(),
                names.len()
            );
        }
        for (col, field) in columns.iter_mut().zip(record.iter()) {
            col.push(CellValue::parse_str(field));
        }
    }

    Frame::from_columns(names, columns)
}

// ---------------------------------------------------------------------------
// Feather decoder
// ---------------------------------------------------------------------------

/// Feather v2 files are Arrow IPC; read every record batch and concatenate.
/// Works with files written by Pandas (`df.to_feather()`) and Polars
/// (`df.write_ipc()`).
fn decode_feather(bytes: &[u8]) -> Result<Frame> {
    let reader =
        FileReader::try_new(Cursor::new(bytes), None).context("reading Arrow IPC metadata")?;
    let schema = reader.schema();

    let names: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading Arrow record batch")?;
        for (col_idx, out) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                out.push(
                    extract_cell(array, row).with_context(|| {
                        format!("column '{}', row {row}", names[col_idx])
                    })?,
                );
            }
        }
    }

    Frame::from_columns(names, columns)
}

/// Extract a single scalar from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                CellValue::String(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                CellValue::String(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            CellValue::Bool(arr.value(row))
        }
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}
