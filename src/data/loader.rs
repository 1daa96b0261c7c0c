use std::fs::File;
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use serde_json::Value as JsonValue;

use super::coerce::coerce_table;
use super::error::LoadError;
use super::model::{CellValue, DatasetBundle, Table};
use super::normalize::normalize_columns;
use crate::config::{DashboardConfig, SourceFile};

/// Header and row-major cells, straight out of a parser.
type RawTable = (Vec<String>, Vec<Vec<CellValue>>);

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the four configured datasets. The first failure aborts the whole load.
pub fn load_bundle(config: &DashboardConfig) -> Result<DatasetBundle, LoadError> {
    let [ad, city, digital, print] =
        SourceFile::ALL.map(|s| (s.label(), config.source_path(s)));

    Ok(DatasetBundle {
        ad_revenue: load_table(ad.0, &ad.1)?,
        city_readiness: load_table(city.0, &city.1)?,
        digital_pilot: load_table(digital.0, &digital.1)?,
        print_sales: load_table(print.0, &print.1)?,
    })
}

/// Parse one file, normalize its headers and coerce numeric columns.
pub fn load_table(name: &str, path: &Path) -> Result<Table, LoadError> {
    let (headers, rows) = read_raw(path)?;
    let mut table = Table::from_rows(name, path, headers, rows);

    normalize_columns(&mut table);
    coerce_table(&mut table);

    log::info!(
        "Loaded {name}: {} rows, columns {:?}",
        table.len(),
        table.column_names()
    );
    Ok(table)
}

/// Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma separated, header row first
/// * `.tsv`          – tab separated, header row first
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet
/// * `.json`         – `[{ "column": value, ... }, ...]`
fn read_raw(path: &Path) -> Result<RawTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => read_delimited(path, b','),
        "tsv" => read_delimited(path, b'\t'),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_spreadsheet(path),
        "json" => read_json(path),
        _ => Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Empty header cells get a positional placeholder name. Whitespace-only
/// headers are kept as they are.
fn header_name(raw: String, idx: usize) -> String {
    if raw.is_empty() {
        format!("Unnamed: {idx}")
    } else {
        raw
    }
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

fn read_delimited(path: &Path, delimiter: u8) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .enumerate()
        .map(|(i, h)| header_name(h.to_string(), i))
        .collect();
    if headers.is_empty() {
        return Err(LoadError::malformed(path, "no header row"));
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        if record.len() > headers.len() {
            return Err(LoadError::malformed(
                path,
                format!(
                    "row {row_no} has {} fields but the header has {}",
                    record.len(),
                    headers.len()
                ),
            ));
        }
        rows.push(record.iter().map(text_cell).collect());
    }

    Ok((headers, rows))
}

fn text_cell(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Null
    } else {
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Spreadsheets
// ---------------------------------------------------------------------------

fn read_spreadsheet(path: &Path) -> Result<RawTable, LoadError> {
    let sheet_err = |source| LoadError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(sheet_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::malformed(path, "workbook has no worksheets"))?
        .map_err(sheet_err)?;

    range_to_raw(path, &range)
}

/// First row of the used range is the header.
fn range_to_raw(path: &Path, range: &Range<Data>) -> Result<RawTable, LoadError> {
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| LoadError::malformed(path, "worksheet is empty"))?;

    let headers = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let raw = match cell {
                Data::Empty => String::new(),
                Data::String(s) => s.clone(),
                other => other.to_string(),
            };
            header_name(raw, i)
        })
        .collect();

    let rows = rows
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();

    Ok((headers, rows))
}

fn spreadsheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(v) => CellValue::Float(*v),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if s.is_empty() => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTimeIso(s) => CellValue::Date(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) => {
                let stamp = dt.to_string();
                let date = stamp.strip_suffix(" 00:00:00").unwrap_or(&stamp);
                CellValue::Date(date.to_string())
            }
            None => CellValue::Text(cell.to_string()),
        },
    }
}

// ---------------------------------------------------------------------------
// JSON records
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "City": "Pune", "Users": 1200 },
///   { "City": "Agra", "Users": 800 }
/// ]
/// ```
///
/// Columns are the union of keys, in first-seen order.
fn read_json(path: &Path) -> Result<RawTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::malformed(path, "expected top-level JSON array"))?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::malformed(path, format!("record {i} is not an object")))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok((headers, rows))
}

fn json_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => text_cell(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}
