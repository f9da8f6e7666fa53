//! Spreadsheet-style cell addressing

use std::fmt;

/// Convert a 1-based column index to its label (1 -> A, 26 -> Z, 27 -> AA).
/// Column 0 has no label and yields an empty string.
pub fn column_label(col: u32) -> String {
    let mut result = String::new();
    let mut col = col;
    while col > 0 {
        let rem = (col - 1) % 26;
        result.insert(0, (b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    result
}

/// Cell reference with 1-based coordinates (e.g., A1, B2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CellReference {
    pub row: u32,
    pub col: u32,
}

impl CellReference {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_label(self.col), self.row)
    }
}
