//! Worksheet grid to record normalization
//!
//! Each worksheet becomes an ordered list of sparse records. Without a
//! header row, records are keyed by column label (A, B, ..., AA). With a
//! header row, records are keyed by the normalized header names and rows at
//! or above the header row produce nothing. Rows whose values are all null
//! are dropped, and so are worksheets left without records.

use crate::error::CellError;
use crate::reader::{Cell, CellValue, Sheet, Workbook};
use crate::reference::{CellReference, column_label};
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One normalized row: key to value, in column order
pub type Record = IndexMap<String, Value>;

/// Worksheet title to its records, in workbook order
pub type SheetRecords = IndexMap<String, Vec<Record>>;

/// How header names line up with data columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderAlignment {
    /// Compatible with existing consumers: the header scan stops before the
    /// sheet's last column and empty header cells are dropped, so data
    /// column `n` takes the `n`-th non-empty header name.
    #[default]
    Compat,
    /// Header index equals column index: every column up to the last one
    /// is scanned and empty header cells keep their column label as key.
    Positional,
}

/// Header row in effect for one worksheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSpec {
    /// 1-based row index, never zero
    pub row: u32,
    pub alignment: HeaderAlignment,
}

impl HeaderSpec {
    /// `None` for row 0, which means "no header"
    pub fn new(row: u32, alignment: HeaderAlignment) -> Option<Self> {
        (row > 0).then_some(Self { row, alignment })
    }
}

/// Lowercase and replace spaces with underscores
pub fn normalize_header_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Build the header keys of a worksheet from its header row
pub fn build_header(sheet: &Sheet, spec: HeaderSpec) -> Vec<String> {
    let last_column = match spec.alignment {
        HeaderAlignment::Compat => sheet.max_column.saturating_sub(1),
        HeaderAlignment::Positional => sheet.max_column,
    };

    let mut header = Vec::new();
    for col in 1..=last_column {
        let value = sheet.value(spec.row, col);
        match header_text(value) {
            Some(name) => header.push(normalize_header_name(&name)),
            None if spec.alignment == HeaderAlignment::Positional => {
                header.push(column_label(col));
            }
            None => {}
        }
    }

    debug!(sheet = %sheet.name, row = spec.row, ?header, "built header");
    header
}

fn header_text(value: &CellValue) -> Option<String> {
    if !value.is_truthy() {
        return None;
    }
    match value {
        CellValue::Text(s) => Some(s.clone()),
        CellValue::Number(n) => Some(Value::Number(*n).to_string()),
        CellValue::Boolean(b) => Some(b.to_string()),
        CellValue::DateTime(dt) => Some(Value::DateTime(*dt).to_string()),
        CellValue::Empty | CellValue::Error(_) => None,
    }
}

/// Key under which a cell is stored in its record
fn record_key(cell: &Cell, header: Option<&[String]>) -> Result<String, CellError> {
    match header {
        None => Ok(cell.label()),
        Some(keys) => (cell.col as usize)
            .checked_sub(1)
            .and_then(|idx| keys.get(idx))
            .cloned()
            .ok_or(CellError::MissingHeader {
                cell: CellReference::new(cell.row, cell.col),
                header_len: keys.len(),
            }),
    }
}

/// Turn one row into a record, skipping cells that fail extraction
fn build_record(sheet_name: &str, row: &[Cell], header: Option<&[String]>) -> Record {
    let mut record = Record::new();
    for cell in row {
        let entry = record_key(cell, header)
            .and_then(|key| Value::from_cell(cell).map(|value| (key, value)));
        match entry {
            Ok((key, value)) => {
                record.insert(key, value);
            }
            Err(e) => debug!(sheet = %sheet_name, error = %e, "skipping cell"),
        }
    }
    record
}

/// A record is kept when it has at least one key and one non-null value
fn is_meaningful(record: &Record) -> bool {
    !record.is_empty() && !record.values().all(Value::is_null)
}

/// Normalize a single worksheet into its records
pub fn normalize_sheet(sheet: &Sheet, header: Option<HeaderSpec>) -> Vec<Record> {
    let keys = header.map(|spec| build_header(sheet, spec));

    let mut records = Vec::new();
    for row in sheet.rows() {
        if let (Some(spec), Some(first)) = (header, row.first()) {
            // Rows at or above the header produce no content
            if first.row <= spec.row {
                continue;
            }
        }

        let record = build_record(&sheet.name, &row, keys.as_deref());
        if is_meaningful(&record) {
            records.push(record);
        }
    }
    records
}

/// Normalize every worksheet of a workbook. `header_for` resolves the header
/// row in effect for a worksheet title. Worksheets without records are left
/// out.
pub fn normalize_workbook<F>(workbook: &Workbook, header_for: F) -> SheetRecords
where
    F: Fn(&str) -> Option<HeaderSpec>,
{
    let mut result = SheetRecords::new();
    for sheet in &workbook.sheets {
        let records = normalize_sheet(sheet, header_for(&sheet.name));
        if records.is_empty() {
            debug!(sheet = %sheet.name, "no records, leaving sheet out");
            continue;
        }
        result.insert(sheet.name.clone(), records);
    }
    result
}
