use serde::{Deserialize, Serialize};
use std::fmt;

/// A single scalar cell as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, ""),
            CellValue::Boolean(value) => write!(f, "{}", value),
            CellValue::Integer(value) => write!(f, "{}", value),
            CellValue::Float(value) => write!(f, "{}", value),
            CellValue::Text(value) => write!(f, "{}", value),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

pub type Row = Vec<CellValue>;

static NULL_CELL: CellValue = CellValue::Null;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableReference {
    pub name: String,
    #[serde(default)]
    pub count: Option<u64>,
}

impl TableReference {
    pub fn label(&self) -> String {
        match self.count {
            Some(count) => format!("{} ({})", self.name, count),
            None => self.name.clone(),
        }
    }
}

/// Columns and rows of one fetched table. Replaced wholesale on re-fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TablePayload {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl TablePayload {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell at `column` of `row`, padding short rows with nulls.
    pub fn cell<'a>(&self, row: &'a Row, column: usize) -> &'a CellValue {
        row.get(column).unwrap_or(&NULL_CELL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Boolean(true).to_string(), "true");
        assert_eq!(CellValue::Integer(-4).to_string(), "-4");
        assert_eq!(CellValue::Float(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Text("abc".to_string()).to_string(), "abc");
    }

    #[test]
    fn test_short_rows_pad_with_null() {
        let payload = TablePayload {
            columns: vec!["a".to_string(), "b".to_string()],
            rows: vec![vec![CellValue::Integer(1)]],
        };
        let row = &payload.rows[0];
        assert_eq!(payload.cell(row, 0), &CellValue::Integer(1));
        assert!(payload.cell(row, 1).is_null());
    }

    #[test]
    fn test_table_label() {
        let counted = TableReference {
            name: "users".to_string(),
            count: Some(12),
        };
        let plain = TableReference {
            name: "events".to_string(),
            count: None,
        };
        assert_eq!(counted.label(), "users (12)");
        assert_eq!(plain.label(), "events");
    }
}
