//! Record values handed to downstream consumers

use crate::error::CellError;
use crate::reader::Cell;
use crate::reader::CellValue;
use crate::reference::CellReference;
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A single record value. Serializes untagged: `null`, a string, a number
/// (integral numbers without a fractional part), a bool, or an ISO-8601
/// datetime string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    String(String),
    Number(#[serde(serialize_with = "serialize_number")] f64),
    Boolean(bool),
    DateTime(#[serde(serialize_with = "serialize_datetime")] NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extract the record value of a cell. Undecodable cells fail extraction.
    pub fn from_cell(cell: &Cell) -> Result<Value, CellError> {
        match &cell.value {
            CellValue::Empty => Ok(Value::Null),
            CellValue::Text(s) => Ok(Value::String(s.clone())),
            CellValue::Number(n) => Ok(Value::Number(*n)),
            CellValue::Boolean(b) => Ok(Value::Boolean(*b)),
            CellValue::DateTime(dt) => Ok(Value::DateTime(*dt)),
            CellValue::Error(e) => Err(CellError::Undecodable {
                cell: CellReference::new(cell.row, cell.col),
                value: e.clone(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "{}", s),
            Value::Number(n) => match as_integer(*n) {
                Some(i) => write!(f, "{}", i),
                None => write!(f, "{}", n),
            },
            Value::Boolean(b) => write!(f, "{}", b),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

/// Spreadsheets store every number as a float; whole values read back as
/// integers.
fn as_integer(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        Some(n as i64)
    } else {
        None
    }
}

fn serialize_number<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match as_integer(*n) {
        Some(i) => serializer.serialize_i64(i),
        None => serializer.serialize_f64(*n),
    }
}

fn serialize_datetime<S: Serializer>(
    dt: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&dt.format(DATETIME_FORMAT))
}
