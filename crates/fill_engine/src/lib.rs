//! Fill Engine - placeholder substitution for office documents
//!
//! Two replacers share one token mapping type:
//!
//! - [`RunAwareReplacer`] rewrites a paragraph whose text is split into
//!   formatted runs. Placeholders may straddle run boundaries; the
//!   replacer matches against the concatenated text, then spreads the new
//!   text back over the original runs in proportion to their old lengths.
//!   Run count, order and formatting handles never change.
//! - [`CellReplacer`] rewrites a single unfragmented value such as a
//!   spreadsheet cell.
//!
//! Both are pure functions of (text unit, mapping). They hold no state
//! between calls and can run on disjoint documents from many threads.
//!
//! # Example
//!
//! ```rust
//! use doc_model::Paragraph;
//! use fill_engine::{RunAwareReplacer, TokenMapping};
//!
//! let mut paragraph = Paragraph::from_texts(["Bonjour ", "[no", "m], bienvenue"]);
//! let mut mapping = TokenMapping::new();
//! mapping.insert("[nom]", "Alice").unwrap();
//!
//! RunAwareReplacer::new().replace(&mut paragraph, &mapping);
//! assert_eq!(paragraph.text(), "Bonjour Alice, bienvenue");
//! assert_eq!(paragraph.run_count(), 3);
//! ```

mod cell_replacer;
mod error;
mod mapping;
mod matcher;
mod run_replacer;
mod usage;

pub use cell_replacer::{CellMode, CellReplacer};
pub use error::{FillError, Result};
pub use mapping::TokenMapping;
pub use matcher::{apply_matches, find_matches, resolve_overlaps, MatchSpan};
pub use run_replacer::{redistribute, run_boundaries, RunAwareReplacer};
pub use usage::TokenUsage;
