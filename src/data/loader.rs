use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{can_cast_types, cast};
use arrow::util::display::array_value_to_string;
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, UInt32Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Columns, Record, Table};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an allotment table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one allotment per line
/// * `.json`    – `[{ "Allotted Institute": "...", "Rank": 17, ... }, ...]`
/// * `.parquet` – flat columns, as written by `df.to_parquet()`
///
/// The four columns named in `columns` must be present; every other column is
/// kept for display.
pub fn load_file(path: &Path, columns: &Columns) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path, columns),
        "json" => load_json(path, columns),
        "parquet" | "pq" => load_parquet(path, columns),
        other => Err(LoadError::UnsupportedFormat(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} allotments from {} ({} extra columns)",
        table.len(),
        path.display(),
        table.extra_columns.len()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Row assembly shared by all formats
// ---------------------------------------------------------------------------

/// Positions of the interpreted columns within a header list.
struct Layout {
    institute: usize,
    course: usize,
    category: usize,
    rank: usize,
    extra: Vec<usize>,
}

impl Layout {
    fn resolve(headers: &[String], columns: &Columns) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };
        Ok(Layout {
            institute: find(&columns.institute)?,
            course: find(&columns.course)?,
            category: find(&columns.category)?,
            rank: find(&columns.rank)?,
            extra: headers
                .iter()
                .enumerate()
                .filter(|(_, h)| !columns.is_interpreted(h))
                .map(|(i, _)| i)
                .collect(),
        })
    }

    fn extra_names(&self, headers: &[String]) -> Vec<String> {
        self.extra.iter().map(|&i| headers[i].clone()).collect()
    }
}

/// Builds records while counting rank cells that could not be read.
#[derive(Default)]
struct RowSink {
    records: Vec<Record>,
    bad_ranks: usize,
}

impl RowSink {
    fn push(&mut self, layout: &Layout, mut cell: impl FnMut(usize) -> CellValue) {
        let rank = match rank_from_cell(cell(layout.rank)) {
            Ok(rank) => rank,
            Err(()) => {
                self.bad_ranks += 1;
                None
            }
        };
        self.records.push(Record {
            institute: text_from_cell(cell(layout.institute)),
            course: text_from_cell(cell(layout.course)),
            category: text_from_cell(cell(layout.category)),
            rank,
            extra: layout.extra.iter().map(|&i| cell(i)).collect(),
        });
    }

    fn finish(self, columns: &Columns, extra_columns: Vec<String>) -> Table {
        if self.bad_ranks > 0 {
            log::warn!(
                "{} rows have a non-integer '{}' and will not match rank questions",
                self.bad_ranks,
                columns.rank
            );
        }
        Table::from_records(self.records, columns.clone(), extra_columns)
    }
}

fn text_from_cell(cell: CellValue) -> Option<String> {
    match cell {
        CellValue::Null => None,
        CellValue::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        other => Some(other.to_string()),
    }
}

/// Ranks are integers; integral floats are accepted because Pandas stores an
/// integer column with gaps as float64.
fn rank_from_cell(cell: CellValue) -> Result<Option<i64>, ()> {
    match cell {
        CellValue::Null => Ok(None),
        CellValue::Integer(i) => Ok(Some(i)),
        CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(Some(f as i64)),
        CellValue::String(s) if s.trim().is_empty() => Ok(None),
        CellValue::String(s) => match guess_cell_type(s.trim()) {
            CellValue::String(_) => Err(()),
            parsed => rank_from_cell(parsed),
        },
        _ => Err(()),
    }
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one allotment per row.
/// Header names are trimmed; cell types are guessed per cell.
fn load_csv(path: &Path, columns: &Columns) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let layout = Layout::resolve(&headers, columns)?;
    let mut sink = RowSink::default();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        sink.push(&layout, |i| guess_cell_type(record.get(i).unwrap_or("").trim()));
    }

    Ok(sink.finish(columns, layout.extra_names(&headers)))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Allotted Institute": "Maulana Azad Medical College, New Delhi",
///     "Course Alloted": "MBBS",
///     "Candidate Category": "General",
///     "Rank": 17
///   },
///   ...
/// ]
/// ```
///
/// Rows may omit keys; a missing key reads as null.
fn load_json(path: &Path, columns: &Columns) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut objects = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or_else(|| LoadError::MalformedRow {
            row: i,
            reason: "not a JSON object".to_string(),
        })?;
        objects.push(obj);
    }

    // Column order is first-seen order across all rows.
    let mut headers: Vec<String> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !headers.iter().any(|h| h == key.trim()) {
                headers.push(key.trim().to_string());
            }
        }
    }

    let layout = Layout::resolve(&headers, columns)?;
    let mut sink = RowSink::default();

    for obj in objects {
        sink.push(&layout, |i| {
            obj.iter()
                .find(|(k, _)| k.trim() == headers[i])
                .map(|(_, v)| json_to_cell(v))
                .unwrap_or(CellValue::Null)
        });
    }

    Ok(sink.finish(columns, layout.extra_names(&headers)))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path, columns: &Columns) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().trim().to_string())
        .collect();
    let layout = Layout::resolve(&headers, columns)?;

    // Per column, the type its arrays are cast to before cells are read.
    let mut targets: Vec<Option<DataType>> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| match f.data_type() {
            DataType::Dictionary(_, values) => Some(values.as_ref().clone()),
            _ => None,
        })
        .collect();
    let fields = builder.schema().fields().clone();
    for (i, is_rank) in [
        (layout.institute, false),
        (layout.course, false),
        (layout.category, false),
        (layout.rank, true),
    ] {
        targets[i] = read_as(&headers[i], fields[i].data_type(), is_rank)?;
    }

    let reader = builder.build().context("building parquet reader")?;
    let mut sink = RowSink::default();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let cols: Vec<ArrayRef> = batch
            .columns()
            .iter()
            .zip(&targets)
            .map(|(col, target)| match target {
                Some(to) => cast(col.as_ref(), to),
                None => Ok(col.clone()),
            })
            .collect::<Result<_, _>>()
            .context("converting parquet columns")?;
        for row in 0..batch.num_rows() {
            sink.push(&layout, |i| arrow_cell(&cols[i], row));
        }
    }

    Ok(sink.finish(columns, layout.extra_names(&headers)))
}

/// The type a required column is cast to before reading, `None` when it is
/// read as stored. Dictionary columns are unpacked; ranks of any integer width
/// are widened to `Int64` and floats to `Float64`.
fn read_as(column: &str, stored: &DataType, is_rank: bool) -> Result<Option<DataType>, LoadError> {
    let target = match stored {
        DataType::Utf8 | DataType::LargeUtf8 => None,
        DataType::Dictionary(_, values) => {
            let inner = read_as(column, values, is_rank)?;
            Some(inner.unwrap_or_else(|| values.as_ref().clone()))
        }
        DataType::Int64 | DataType::Float64 if is_rank => None,
        t if is_rank && t.is_integer() => Some(DataType::Int64),
        t if is_rank && t.is_floating() => Some(DataType::Float64),
        t if !is_rank && can_cast_types(t, &DataType::Utf8) => Some(DataType::Utf8),
        other => {
            return Err(LoadError::UnsupportedColumnType {
                column: column.to_string(),
                data_type: other.to_string(),
                expected: if is_rank { "a rank" } else { "text" },
            })
        }
    };
    Ok(target)
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => match array_value_to_string(col, row) {
            Ok(text) => CellValue::String(text),
            Err(e) => {
                log::warn!("Unreadable {} cell in row {row}: {e}", col.data_type());
                CellValue::Null
            }
        },
    }
}
