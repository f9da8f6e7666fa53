//! Error types for reading workbooks

use crate::reference::CellReference;
use thiserror::Error;

/// Result type alias for read operations
pub type Result<T> = std::result::Result<T, ReadError>;

/// Call-level failures. Any of these aborts the whole read with no partial
/// output.
#[derive(Error, Debug)]
pub enum ReadError {
    /// The payload is not a readable spreadsheet container
    #[error("Failed to parse workbook: {0}")]
    Parse(String),

    /// I/O error while loading a payload from disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A per-call option could not be interpreted
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

impl From<calamine::Error> for ReadError {
    fn from(err: calamine::Error) -> Self {
        ReadError::Parse(err.to_string())
    }
}

/// Cell-level failures. These never abort a read: the cell is left out of
/// its record and processing continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CellError {
    /// The cell content could not be decoded
    #[error("cell {cell} could not be decoded: {value}")]
    Undecodable { cell: CellReference, value: String },

    /// The header has no entry for this cell's column
    #[error("cell {cell} has no header entry (header has {header_len} keys)")]
    MissingHeader {
        cell: CellReference,
        header_len: usize,
    },
}
