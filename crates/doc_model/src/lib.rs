//! Document Model - Text-bearing structures for placeholder filling
//!
//! This crate provides the small document model the fill engine works
//! against: paragraphs made of formatted runs, tables whose cells hold
//! their own paragraphs, headers and footers, and spreadsheet cells.
//!
//! The fill engine never sees concrete types. It goes through the
//! capability traits in [`traits`]: ordered runs with mutable text, and
//! cells with a whole-string value. Formatting is carried by an opaque
//! [`FormatHandle`] that nothing in the engine inspects.

mod cell;
mod document;
mod error;
mod format;
mod paragraph;
mod run;
pub mod section;
pub mod table;
pub mod traits;

pub use cell::*;
pub use document::*;
pub use error::*;
pub use format::*;
pub use paragraph::*;
pub use run::*;
pub use section::*;
pub use table::*;
pub use traits::*;
