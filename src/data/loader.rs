use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, TimeUnit, TimestampMicrosecondType};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{FieldValue, RawTable};
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// List the files in `dir` whose extension is one of `extensions`, sorted by path.
///
/// A missing directory or an empty result is a configuration error.
pub fn discover_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, AnalysisError> {
    if !dir.is_dir() {
        return Err(AnalysisError::Configuration(format!(
            "directory not found at '{}'; create it and place your input files inside",
            dir.display()
        )));
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extensions) {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(AnalysisError::Configuration(format!(
            "no input files ({}) found in '{}'",
            extensions
                .iter()
                .map(|e| format!(".{e}"))
                .collect::<Vec<_>>()
                .join(", "),
            dir.display()
        )));
    }
    debug!("discovered {} input files in {}", paths.len(), dir.display());
    Ok(paths)
}

/// Load every file and stack the results into one table.
pub fn load_all(paths: &[PathBuf]) -> Result<RawTable, AnalysisError> {
    let mut tables = Vec::with_capacity(paths.len());
    for path in paths {
        let table = load_file(path).map_err(|cause| AnalysisError::Read {
            path: path.clone(),
            cause,
        })?;
        info!("loaded {} rows from {}", table.len(), path.display());
        tables.push(table);
    }
    Ok(RawTable::concat(tables))
}

/// Load a single trip file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – columnar trip export (the usual TLC distribution format)
/// * `.csv`     – header row, one trip per line
/// * `.json`    – `[{ "tpep_pickup_datetime": "...", ... }, ...]`
pub fn load_file(path: &Path) -> Result<RawTable> {
    match extension_of(path).as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let ext = extension_of(path);
    extensions.iter().any(|e| *e == ext)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Columns follow the
/// order keys first appear in the file; keys missing from some records become
/// null cells.
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let mut table = RawTable::with_len(records.len());
    for name in names {
        let values = records
            .iter()
            .map(|rec| rec.get(&name).map(json_to_field).unwrap_or(FieldValue::Null))
            .collect();
        table.push_column(name, values);
    }
    Ok(table)
}

fn json_to_field(val: &JsonValue) -> FieldValue {
    match val {
        JsonValue::String(s) => FieldValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float(f)
            } else {
                FieldValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => FieldValue::Bool(*b),
        JsonValue::Null => FieldValue::Null,
        other => FieldValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one trip per record. Cell types
/// are guessed per value; timestamps stay text until cleaning.
fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut columns: Vec<Vec<FieldValue>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, column) in columns.iter_mut().enumerate() {
            column.push(guess_field_type(record.get(col_idx).unwrap_or("")));
        }
    }

    let n_rows = columns.first().map_or(0, Vec::len);
    let mut table = RawTable::with_len(n_rows);
    for (name, values) in headers.into_iter().zip(columns) {
        table.push_column(name, values);
    }
    Ok(table)
}

fn guess_field_type(s: &str) -> FieldValue {
    let s = s.trim();
    if s.is_empty() {
        return FieldValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return FieldValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return FieldValue::Float(f);
    }
    if s == "true" || s == "false" {
        return FieldValue::Bool(s == "true");
    }
    FieldValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet trip file.
///
/// Every column is kept. Integer, floating, string, boolean and timestamp
/// columns are converted; any other Arrow type is read as nulls with a warning.
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut batches = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut table = RawTable::with_len(batch.num_rows());
        for (field, col) in schema.fields().iter().zip(batch.columns()) {
            let values = column_values(col)
                .with_context(|| format!("column '{}'", field.name()))?;
            table.push_column(field.name().clone(), values);
        }
        batches.push(table);
    }

    Ok(RawTable::concat(batches))
}

// -- Parquet / Arrow helpers --

/// Convert a whole Arrow column into cell values.
fn column_values(col: &ArrayRef) -> Result<Vec<FieldValue>> {
    let values = match col.data_type() {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => {
            let arr = cast(col, &DataType::Int64).context("casting to Int64")?;
            arr.as_primitive::<Int64Type>()
                .iter()
                .map(|v| v.map_or(FieldValue::Null, FieldValue::Integer))
                .collect()
        }
        DataType::Float16 | DataType::Float32 | DataType::Float64 | DataType::Decimal128(_, _) => {
            let arr = cast(col, &DataType::Float64).context("casting to Float64")?;
            arr.as_primitive::<Float64Type>()
                .iter()
                .map(|v| v.map_or(FieldValue::Null, FieldValue::Float))
                .collect()
        }
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let arr = cast(col, &DataType::Utf8).context("casting to Utf8")?;
            arr.as_string::<i32>()
                .iter()
                .map(|v| v.map_or(FieldValue::Null, |s| FieldValue::Text(s.to_string())))
                .collect()
        }
        DataType::Boolean => col
            .as_boolean()
            .iter()
            .map(|v| v.map_or(FieldValue::Null, FieldValue::Bool))
            .collect(),
        DataType::Timestamp(_, _) | DataType::Date32 | DataType::Date64 => {
            let target = DataType::Timestamp(TimeUnit::Microsecond, None);
            let arr = cast(col, &target).context("casting to microsecond timestamps")?;
            arr.as_primitive::<TimestampMicrosecondType>()
                .iter()
                .map(|v| {
                    v.and_then(DateTime::<Utc>::from_timestamp_micros)
                        .map_or(FieldValue::Null, |t| FieldValue::Timestamp(t.naive_utc()))
                })
                .collect()
        }
        other => {
            warn!("unsupported column type {other:?}; reading as nulls");
            vec![FieldValue::Null; col.len()]
        }
    };
    Ok(values)
}
