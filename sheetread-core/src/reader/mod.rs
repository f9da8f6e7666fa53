//! Excel/ODS reader using calamine

use crate::error::Result;
use calamine::{Data, Range, Reader, SheetType, Sheets, open_workbook_auto_from_rs};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

pub mod workbook;

pub use workbook::{Cell, CellValue, Sheet, Workbook};

/// Read a workbook from a file path
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let payload = std::fs::read(path.as_ref())?;
    read_workbook_from_bytes(&payload)
}

/// Read a workbook from raw container bytes (xlsx, xlsm, xlsb, xls, ods).
///
/// Any failure to open the container or one of its worksheets fails the
/// whole read.
pub fn read_workbook_from_bytes(payload: &[u8]) -> Result<Workbook> {
    let mut excel: Sheets<_> = open_workbook_auto_from_rs(Cursor::new(payload))?;

    // Chart, dialog and macro sheets hold no cell grid
    let names: Vec<String> = excel
        .sheets_metadata()
        .iter()
        .filter(|meta| meta.typ == SheetType::WorkSheet)
        .map(|meta| meta.name.clone())
        .collect();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = excel.worksheet_range(&name)?;
        let sheet = parse_sheet(&name, &range);
        debug!(
            sheet = %sheet.name,
            rows = sheet.max_row,
            columns = sheet.max_column,
            "parsed worksheet"
        );
        sheets.push(sheet);
    }

    Ok(Workbook { sheets })
}

fn parse_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new(name);

    let (Some(start), Some(end)) = (range.start(), range.end()) else {
        return sheet;
    };

    for (rel_row, rel_col, data) in range.used_cells() {
        let value = parse_cell_value(data);
        if value.is_empty() {
            continue;
        }
        // calamine positions are 0-based and relative to the range start
        let row = start.0 + rel_row as u32 + 1;
        let col = start.1 + rel_col as u32 + 1;
        sheet.set(row, col, value);
    }

    sheet.max_row = end.0 + 1;
    sheet.max_column = end.1 + 1;
    sheet
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        // Error values read back as their display text ("#N/A")
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => {
            if dt.is_duration() {
                CellValue::Number(dt.as_f64())
            } else {
                match dt.as_datetime() {
                    Some(value) => CellValue::DateTime(value),
                    None => CellValue::Error(format!("invalid date serial {}", dt.as_f64())),
                }
            }
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let raw = s.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
