//! Headers and footers

use crate::Block;
use serde::{Deserialize, Serialize};

/// Which page-margin area a header/footer block belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderFooterKind {
    Header,
    Footer,
}

/// Content of one header or footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFooter {
    pub kind: HeaderFooterKind,
    /// Name of the storage part this content came from
    pub source: String,
    pub blocks: Vec<Block>,
}

impl HeaderFooter {
    pub fn new(kind: HeaderFooterKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            blocks: Vec::new(),
        }
    }
}
