//! Workbook data structures

use crate::reference::column_label;
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Represents a parsed workbook, worksheets in workbook order
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Get all sheet names
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Represents a worksheet.
///
/// The grid is anchored at A1: `max_row` and `max_column` are the 1-based
/// extents of the used range, and only populated cells are stored.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub cells: HashMap<(u32, u32), Cell>,
    pub max_row: u32,
    pub max_column: u32,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: HashMap::new(),
            max_row: 0,
            max_column: 0,
        }
    }

    /// Place a value at a 1-based position, growing the extents as needed
    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        self.max_row = self.max_row.max(row);
        self.max_column = self.max_column.max(col);
        self.cells.insert((row, col), Cell { row, col, value });
    }

    /// Get a cell at the given 1-based position
    pub fn get_cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Value at a 1-based position, `Empty` when nothing is stored there
    pub fn value(&self, row: u32, col: u32) -> &CellValue {
        self.get_cell(row, col)
            .map(|c| &c.value)
            .unwrap_or(&CellValue::Empty)
    }

    /// Iterate rows 1..=max_row. Every row visits columns 1..=max_column,
    /// yielding `Empty` cells where nothing is stored.
    pub fn rows(&self) -> impl Iterator<Item = Vec<Cell>> + '_ {
        (1..=self.max_row).map(move |row| {
            (1..=self.max_column)
                .map(|col| {
                    self.get_cell(row, col).cloned().unwrap_or(Cell {
                        row,
                        col,
                        value: CellValue::Empty,
                    })
                })
                .collect()
        })
    }
}

/// Represents a single cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// 1-based row index
    pub row: u32,
    /// 1-based column index
    pub col: u32,
    pub value: CellValue,
}

impl Cell {
    /// Spreadsheet-style column label (A, B, ..., AA)
    pub fn label(&self) -> String {
        column_label(self.col)
    }
}

/// Cell value types as read from the container
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    DateTime(NaiveDateTime),
    /// Content that could not be decoded, such as a date serial outside
    /// the representable range
    Error(String),
}

impl CellValue {
    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Truthiness used when deciding whether a header cell names a column:
    /// empty cells, empty strings, zero, `false` and undecodable cells name
    /// nothing.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Empty | CellValue::Error(_) => false,
            CellValue::Text(s) => !s.is_empty(),
            CellValue::Number(n) => *n != 0.0,
            CellValue::Boolean(b) => *b,
            CellValue::DateTime(_) => true,
        }
    }
}
