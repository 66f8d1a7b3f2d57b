//! Whole-value replacement for spreadsheet cells and other unfragmented text

use crate::mapping::TokenMapping;
use crate::matcher::{apply_matches, find_matches, resolve_overlaps};
use crate::usage::TokenUsage;
use doc_model::TextCell;
use serde::{Deserialize, Serialize};

/// How tokens are applied to a cell value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellMode {
    /// Apply each token in mapping order to the output of the previous one.
    /// A value introduced by one token can be matched by a later token.
    #[default]
    Sequential,
    /// Match all tokens against the original value once, like paragraphs
    SinglePass,
}

/// Replaces tokens in single-string cells
#[derive(Debug, Clone, Copy, Default)]
pub struct CellReplacer {
    mode: CellMode,
}

impl CellReplacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the application mode
    pub fn with_mode(mut self, mode: CellMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> CellMode {
        self.mode
    }

    /// Replace tokens in the cell. Empty and non-text cells are skipped and
    /// the cell is only written when its value actually changed.
    pub fn replace<C: TextCell + ?Sized>(&self, cell: &mut C, mapping: &TokenMapping) {
        let mut usage = TokenUsage::new();
        self.replace_with_usage(cell, mapping, &mut usage);
    }

    /// Same as [`replace`](Self::replace), recording substitutions into `usage`.
    /// Returns true when the cell was written.
    pub fn replace_with_usage<C: TextCell + ?Sized>(
        &self,
        cell: &mut C,
        mapping: &TokenMapping,
        usage: &mut TokenUsage,
    ) -> bool {
        if mapping.is_empty() {
            return false;
        }
        let Some(original) = cell.text_value() else {
            return false;
        };
        let original = original.into_owned();

        let updated = match self.mode {
            CellMode::Sequential => sequential(&original, mapping, usage),
            CellMode::SinglePass => single_pass(&original, mapping, usage),
        };

        if updated == original {
            return false;
        }
        cell.set_text_value(updated);
        usage.record_unit_changed();
        true
    }
}

fn sequential(text: &str, mapping: &TokenMapping, usage: &mut TokenUsage) -> String {
    let mut value = text.to_string();
    for (token, replacement) in mapping.iter() {
        let count = value.matches(token).count();
        if count > 0 {
            usage.record_hits(token, count);
            value = value.replace(token, replacement);
        }
    }
    value
}

fn single_pass(text: &str, mapping: &TokenMapping, usage: &mut TokenUsage) -> String {
    let matches = resolve_overlaps(find_matches(text, mapping));
    for span in &matches {
        if let Some((token, _)) = mapping.entry(span.token_index) {
            usage.record_hits(token, 1);
        }
    }
    apply_matches(text, &matches, mapping)
}
