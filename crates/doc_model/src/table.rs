//! Tables - rows of cells, each cell holding its own blocks

use crate::Block;
use serde::{Deserialize, Serialize};

/// A table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

/// A row of a table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// A cell in a table row. Cells may nest further tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    pub blocks: Vec<Block>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }
}
