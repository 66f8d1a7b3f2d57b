//! Document - body blocks plus header and footer content

use crate::{DocModelError, HeaderFooter, HeaderFooterKind, Paragraph, Result, Run, Table, TableCell, TableRow};
use serde::{Deserialize, Serialize};

/// A block-level element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// Region of a document a caller wants to visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Body,
    Headers,
    Footers,
}

impl Scope {
    /// Visiting order used when filling a whole document
    pub const ALL: [Scope; 3] = [Scope::Headers, Scope::Body, Scope::Footers];
}

/// A word-processing document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub body: Vec<Block>,
    pub headers: Vec<HeaderFooter>,
    pub footers: Vec<HeaderFooter>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add header or footer content, routed by its kind
    pub fn add_header_footer(&mut self, content: HeaderFooter) {
        match content.kind {
            HeaderFooterKind::Header => self.headers.push(content),
            HeaderFooterKind::Footer => self.footers.push(content),
        }
    }

    /// Paragraphs of one scope in document order.
    ///
    /// Paragraphs inside table cells are only returned when
    /// `include_tables` is set.
    pub fn paragraphs_mut(&mut self, scope: Scope, include_tables: bool) -> Vec<&mut Paragraph> {
        let mut out = Vec::new();
        match scope {
            Scope::Body => collect_paragraphs(&mut self.body, include_tables, &mut out),
            Scope::Headers => {
                for header in &mut self.headers {
                    collect_paragraphs(&mut header.blocks, include_tables, &mut out);
                }
            }
            Scope::Footers => {
                for footer in &mut self.footers {
                    collect_paragraphs(&mut footer.blocks, include_tables, &mut out);
                }
            }
        }
        out
    }

    /// Every paragraph of the document, header first then body then footer
    pub fn all_paragraphs_mut(&mut self, include_tables: bool) -> Vec<&mut Paragraph> {
        let mut out = Vec::new();
        for header in &mut self.headers {
            collect_paragraphs(&mut header.blocks, include_tables, &mut out);
        }
        collect_paragraphs(&mut self.body, include_tables, &mut out);
        for footer in &mut self.footers {
            collect_paragraphs(&mut footer.blocks, include_tables, &mut out);
        }
        out
    }

    /// Every run of the document in header, body, footer order, table
    /// cells included
    pub fn runs(&self) -> Vec<&Run> {
        let mut out = Vec::new();
        for header in &self.headers {
            collect_runs(&header.blocks, &mut out);
        }
        collect_runs(&self.body, &mut out);
        for footer in &self.footers {
            collect_runs(&footer.blocks, &mut out);
        }
        out
    }

    /// Plain text of the body, one line per top-level paragraph
    pub fn body_text(&self) -> String {
        self.body
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) => Some(p.text()),
                Block::Table(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub(crate) fn collect_paragraphs<'a>(
    blocks: &'a mut [Block],
    include_tables: bool,
    out: &mut Vec<&'a mut Paragraph>,
) {
    for block in blocks.iter_mut() {
        match block {
            Block::Paragraph(p) => out.push(p),
            Block::Table(table) if include_tables => {
                for row in &mut table.rows {
                    for cell in &mut row.cells {
                        collect_paragraphs(&mut cell.blocks, include_tables, out);
                    }
                }
            }
            Block::Table(_) => {}
        }
    }
}

fn collect_runs<'a>(blocks: &'a [Block], out: &mut Vec<&'a Run>) {
    for block in blocks {
        match block {
            Block::Paragraph(p) => out.extend(p.runs()),
            Block::Table(table) => {
                for cell in table.rows.iter().flat_map(|r| r.cells.iter()) {
                    collect_runs(&cell.blocks, out);
                }
            }
        }
    }
}

enum Frame {
    Root(Vec<Block>),
    Table(Table),
    Row(TableRow),
    Cell(TableCell),
    Paragraph(Paragraph),
}

impl Frame {
    fn label(&self) -> &'static str {
        match self {
            Frame::Root(_) => "root",
            Frame::Table(_) => "table",
            Frame::Row(_) => "row",
            Frame::Cell(_) => "cell",
            Frame::Paragraph(_) => "paragraph",
        }
    }
}

/// Builds a block tree from a stream of start/end notifications.
///
/// Readers that walk markup call the `start_*`/`end_*` pairs as elements
/// open and close. A paragraph that opens while another is still open
/// (text boxes anchored inside a run) is attached to the nearest
/// enclosing cell or root once it closes.
pub struct BlockBuilder {
    stack: Vec<Frame>,
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            stack: vec![Frame::Root(Vec::new())],
        }
    }

    pub fn start_paragraph(&mut self) {
        self.stack.push(Frame::Paragraph(Paragraph::new()));
    }

    /// Append a run to the innermost open paragraph
    pub fn push_run(&mut self, run: Run) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::Paragraph(p)) => {
                p.push_run(run);
                Ok(())
            }
            _ => Err(DocModelError::TextOutsideParagraph),
        }
    }

    pub fn end_paragraph(&mut self) -> Result<()> {
        match self.pop("paragraph")? {
            Frame::Paragraph(p) => self.attach(Block::Paragraph(p)),
            _ => unreachable!("pop checked the frame kind"),
        }
    }

    pub fn start_table(&mut self) {
        self.stack.push(Frame::Table(Table::new()));
    }

    pub fn end_table(&mut self) -> Result<()> {
        match self.pop("table")? {
            Frame::Table(t) => self.attach(Block::Table(t)),
            _ => unreachable!("pop checked the frame kind"),
        }
    }

    pub fn start_row(&mut self) {
        self.stack.push(Frame::Row(TableRow::default()));
    }

    pub fn end_row(&mut self) -> Result<()> {
        let row = match self.pop("row")? {
            Frame::Row(r) => r,
            _ => unreachable!("pop checked the frame kind"),
        };
        match self.stack.last_mut() {
            Some(Frame::Table(t)) => {
                t.rows.push(row);
                Ok(())
            }
            other => Err(DocModelError::UnbalancedElement {
                expected: "table".to_string(),
                found: other.map(|f| f.label()).unwrap_or("nothing").to_string(),
            }),
        }
    }

    pub fn start_cell(&mut self) {
        self.stack.push(Frame::Cell(TableCell::default()));
    }

    pub fn end_cell(&mut self) -> Result<()> {
        let cell = match self.pop("cell")? {
            Frame::Cell(c) => c,
            _ => unreachable!("pop checked the frame kind"),
        };
        match self.stack.last_mut() {
            Some(Frame::Row(r)) => {
                r.cells.push(cell);
                Ok(())
            }
            other => Err(DocModelError::UnbalancedElement {
                expected: "row".to_string(),
                found: other.map(|f| f.label()).unwrap_or("nothing").to_string(),
            }),
        }
    }

    /// Close the builder and return the root blocks
    pub fn finish(mut self) -> Result<Vec<Block>> {
        match (self.stack.pop(), self.stack.is_empty()) {
            (Some(Frame::Root(blocks)), true) => Ok(blocks),
            (Some(frame), _) => Err(DocModelError::UnbalancedElement {
                expected: "root".to_string(),
                found: frame.label().to_string(),
            }),
            (None, _) => Err(DocModelError::TreeStructureError("empty builder".to_string())),
        }
    }

    fn pop(&mut self, expected: &str) -> Result<Frame> {
        let matches = matches!(
            (self.stack.last(), expected),
            (Some(Frame::Paragraph(_)), "paragraph")
                | (Some(Frame::Table(_)), "table")
                | (Some(Frame::Row(_)), "row")
                | (Some(Frame::Cell(_)), "cell")
        );
        if !matches {
            return Err(DocModelError::UnbalancedElement {
                expected: expected.to_string(),
                found: self.stack.last().map(Frame::label).unwrap_or("nothing").to_string(),
            });
        }
        self.stack
            .pop()
            .ok_or_else(|| DocModelError::TreeStructureError("stack underflow".to_string()))
    }

    fn attach(&mut self, block: Block) -> Result<()> {
        for frame in self.stack.iter_mut().rev() {
            match frame {
                Frame::Root(blocks) => {
                    blocks.push(block);
                    return Ok(());
                }
                Frame::Cell(cell) => {
                    cell.blocks.push(block);
                    return Ok(());
                }
                Frame::Paragraph(_) => continue,
                Frame::Table(_) | Frame::Row(_) => {
                    return Err(DocModelError::TreeStructureError(format!(
                        "block closed directly inside a {}",
                        frame.label()
                    )));
                }
            }
        }
        Err(DocModelError::TreeStructureError("no container for block".to_string()))
    }
}
