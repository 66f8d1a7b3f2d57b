//! Spreadsheet cells and the workbook view used for substitution

use crate::{FormatHandle, TextCell};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Value held by a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// No value
    Empty,
    /// Text value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Boolean value
    Boolean(bool),
    /// Spreadsheet error marker (e.g. `#DIV/0!`), never substituted
    Error(String),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl CellValue {
    /// Check if the value is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text form used for token matching
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            CellValue::Empty | CellValue::Error(_) => None,
            CellValue::Text(s) => Some(Cow::Borrowed(s)),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    Some(Cow::Owned(format!("{}", *n as i64)))
                } else {
                    Some(Cow::Owned(n.to_string()))
                }
            }
            CellValue::Boolean(b) => Some(Cow::Borrowed(if *b { "TRUE" } else { "FALSE" })),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// A1-style reference when known
    pub reference: Option<String>,
    /// Current value
    pub value: CellValue,
    /// Storage handle owned by the reader that produced the cell
    handle: FormatHandle,
    /// Set when the value has been overwritten
    #[serde(skip)]
    dirty: bool,
}

impl Cell {
    /// Create a cell with a value
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            reference: None,
            value: value.into(),
            handle: FormatHandle::default(),
            dirty: false,
        }
    }

    /// Create an empty cell
    pub fn empty() -> Self {
        Self::new(CellValue::Empty)
    }

    /// Bind the cell to a storage handle
    pub fn with_handle(mut self, handle: FormatHandle) -> Self {
        self.handle = handle;
        self
    }

    /// Set the A1 reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Storage handle
    pub fn handle(&self) -> FormatHandle {
        self.handle
    }

    /// Whether the value was overwritten since creation
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl TextCell for Cell {
    fn text_value(&self) -> Option<Cow<'_, str>> {
        self.value.as_text()
    }

    fn set_text_value(&mut self, value: String) {
        self.value = CellValue::Text(value);
        self.dirty = true;
    }
}

/// A named worksheet holding the text-bearing cells that were loaded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: Vec::new(),
        }
    }
}

/// Text-bearing cells of a workbook.
///
/// Shared strings are listed once, whatever the number of cells that
/// reference them; sheets hold the cells that carry their own string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub shared_strings: Vec<Cell>,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every text-bearing cell, shared strings first
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.shared_strings
            .iter_mut()
            .chain(self.sheets.iter_mut().flat_map(|s| s.cells.iter_mut()))
    }

    /// Total number of loaded cells
    pub fn cell_count(&self) -> usize {
        self.shared_strings.len() + self.sheets.iter().map(|s| s.cells.len()).sum::<usize>()
    }
}
