//! In-memory snapshot of the grade sheet

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single raw cell as read from the sheet.
///
/// Numeric cells keep their numeric type so that identifiers stored as
/// spreadsheet numbers stringify the way the sheet export does (`202412345.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Empty,
}

impl CellValue {
    /// Type a raw text cell: empty, integer, float, or plain text.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        if let Ok(int) = trimmed.parse::<i64>() {
            return CellValue::Integer(int);
        }
        match trimmed.parse::<f64>() {
            Ok(float) if float.is_finite() => CellValue::Float(float),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Integer(int) => write!(f, "{}", int),
            // Integral floats keep their ".0", matching how the sheet export renders them
            CellValue::Float(float) if float.fract() == 0.0 && float.abs() < 1e16 => {
                write!(f, "{:.1}", float)
            }
            CellValue::Float(float) => write!(f, "{}", float),
            CellValue::Empty => Ok(()),
        }
    }
}

/// One roster row, keyed by column name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    cells: HashMap<String, CellValue>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Display value of a column; missing cells read as empty.
    pub fn display(&self, column: &str) -> String {
        self.get(column).map(ToString::to_string).unwrap_or_default()
    }
}

/// When a column name repeats, the first occurrence is kept.
impl FromIterator<(String, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        let mut cells = HashMap::new();
        for (column, value) in iter {
            cells.entry(column).or_insert(value);
        }
        Self { cells }
    }
}

/// Ordered rows plus the header they were read with.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Roster {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Roster {
    /// Build a roster from a header and positional records.
    ///
    /// Headers are trimmed. Records shorter than the header are padded with
    /// [`CellValue::Empty`]; extra trailing cells are dropped.
    pub fn from_records<H, R>(headers: H, records: R) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        R: IntoIterator<Item = Vec<CellValue>>,
    {
        let columns: Vec<String> = headers
            .into_iter()
            .map(|h| h.as_ref().trim().to_string())
            .collect();

        let rows: Vec<Row> = records
            .into_iter()
            .map(|mut record| {
                record.resize(columns.len(), CellValue::Empty);
                columns.iter().cloned().zip(record).collect::<Row>()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
