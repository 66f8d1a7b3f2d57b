//! Data source types for placeholder filling

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tabular data loaded from a CSV or spreadsheet file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    /// Identifier, usually the file stem
    pub id: String,
    /// Where the data came from
    pub source_type: DataSourceType,
    /// Columns in file order
    pub columns: Vec<ColumnDef>,
    /// Data rows, the placeholder row included
    pub records: Vec<Record>,
}

impl DataSource {
    pub fn new(id: impl Into<String>, source_type: DataSourceType) -> Self {
        Self {
            id: id.into(),
            source_type,
            columns: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Create an in-memory data source
    pub fn inline(id: impl Into<String>) -> Self {
        Self::new(id, DataSourceType::Inline)
    }

    pub fn add_column(&mut self, column: ColumnDef) {
        self.columns.push(column);
    }

    pub fn add_record(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in file order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn get_record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// The last `limit` records with their indices, oldest first
    pub fn tail(&self, limit: usize) -> Vec<(usize, &Record)> {
        let skip = self.records.len().saturating_sub(limit);
        self.records.iter().enumerate().skip(skip).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Value at (record, column), if both exist
    pub fn get_value(&self, record_index: usize, column_name: &str) -> Option<&Value> {
        self.records.get(record_index).and_then(|r| r.get(column_name))
    }
}

/// Origin of a data source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataSourceType {
    Csv {
        path: String,
        delimiter: char,
        has_header: bool,
    },
    Xlsx {
        path: String,
        sheet: String,
    },
    Inline,
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Header text, used as the record key
    pub name: String,
    pub data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Data type for column values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Text,
    Number,
    Date,
    Boolean,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Number => "number",
            DataType::Date => "date",
            DataType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single row keyed by column name
pub type Record = HashMap<String, Value>;

/// A value in a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Boolean(bool),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// String form written into documents.
    ///
    /// Integers print without a decimal part, dates as `dd/mm/yyyy` and
    /// missing values as the empty string.
    pub fn to_string_value(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Value::Date(d) => d.format("%d/%m/%Y").to_string(),
            Value::Boolean(b) => if *b { "True" } else { "False" }.to_string(),
            Value::Null => String::new(),
        }
    }

    /// Parse a raw field with type detection. Leading zeros are kept as
    /// text so postcodes and phone numbers survive.
    pub fn parse_auto(s: &str) -> Value {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Value::Null;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Value::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Value::Boolean(false);
        }
        if let Some(date) = try_parse_date(trimmed) {
            return Value::Date(date);
        }
        let leading_zero = trimmed.len() > 1 && trimmed.starts_with('0') && !trimmed.starts_with("0.");
        if !leading_zero {
            if let Ok(n) = trimmed.parse::<f64>() {
                return Value::Number(n);
            }
        }
        Value::Text(s.to_string())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_value())
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

fn try_parse_date(s: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}
