//! Store - Office package I/O and settings persistence
//!
//! This crate opens DOCX and XLSX files as text models the fill engine can
//! work on, writes edited text back into the original XML, replaces header
//! logos, and persists batch settings.
//!
//! Parts of a package that carry no text are never parsed: saving copies
//! them across byte for byte.

mod error;
mod settings;
pub mod docx;
pub mod package;
pub mod xlsx;

pub use error::*;
pub use settings::*;

pub use docx::{DocxDocument, LogoImage, EMU_PER_INCH};
pub use package::{OfficePackage, PackageError, PackageResult};
pub use xlsx::XlsxWorkbook;

use std::path::Path;

/// Office formats that can be filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Docx,
    Xlsx,
}

impl DocumentFormat {
    /// Format of a file, from its extension
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "docx" => Some(Self::Docx),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
        }
    }
}
