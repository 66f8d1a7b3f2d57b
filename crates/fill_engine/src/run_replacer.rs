//! Run-aware replacement
//!
//! Word processors split a paragraph into runs wherever formatting,
//! spell-check state or edit history changes, so a placeholder typed as
//! `[nom]` may be stored as `"[no"` + `"m]"`. Matching per run misses it.
//!
//! The replacer matches against the concatenated paragraph text, then
//! hands the new text back to the existing runs. Run `i` with original
//! length `L_i` (out of total `L`) receives `floor(N * L_i / L)` characters
//! of the new text of length `N`; the last run takes whatever remains.
//! Lengths are counted in characters so no run is cut inside a code point.

use crate::mapping::TokenMapping;
use crate::matcher::{apply_matches, find_matches, resolve_overlaps};
use crate::usage::TokenUsage;
use doc_model::{RunContainer, TextRun};
use std::ops::Range;

/// Replaces placeholders inside a paragraph without adding or removing runs
#[derive(Debug, Clone, Copy, Default)]
pub struct RunAwareReplacer;

impl RunAwareReplacer {
    pub fn new() -> Self {
        Self
    }

    /// Replace every token of `mapping` found in the paragraph text.
    ///
    /// A paragraph with no match is left untouched, including run texts
    /// that would otherwise be reshuffled by redistribution.
    pub fn replace<P: RunContainer + ?Sized>(&self, paragraph: &mut P, mapping: &TokenMapping) {
        let mut usage = TokenUsage::new();
        self.replace_with_usage(paragraph, mapping, &mut usage);
    }

    /// Same as [`replace`](Self::replace), recording substitutions into `usage`.
    /// Returns true when the paragraph text changed.
    pub fn replace_with_usage<P: RunContainer + ?Sized>(
        &self,
        paragraph: &mut P,
        mapping: &TokenMapping,
        usage: &mut TokenUsage,
    ) -> bool {
        if mapping.is_empty() || paragraph.runs().is_empty() {
            return false;
        }

        let full_text = paragraph.full_text();
        let matches = resolve_overlaps(find_matches(&full_text, mapping));
        if matches.is_empty() {
            return false;
        }

        for span in &matches {
            if let Some((token, _)) = mapping.entry(span.token_index) {
                usage.record_hits(token, 1);
            }
        }

        let new_text = apply_matches(&full_text, &matches, mapping);
        let lengths: Vec<usize> = run_boundaries(paragraph).iter().map(|r| r.len()).collect();
        let Some(slices) = redistribute(&new_text, &lengths) else {
            return false;
        };

        for (run, slice) in paragraph.runs_mut().iter_mut().zip(slices) {
            if run.text() != slice {
                run.set_text(slice);
            }
        }
        usage.record_unit_changed();
        true
    }
}

/// Character range each run covers in the concatenated paragraph text
pub fn run_boundaries<P: RunContainer + ?Sized>(paragraph: &P) -> Vec<Range<usize>> {
    let mut offset = 0;
    paragraph
        .runs()
        .iter()
        .map(|run| {
            let start = offset;
            offset += run.text().chars().count();
            start..offset
        })
        .collect()
}

/// Split `new_text` over runs proportionally to their original character
/// lengths.
///
/// Returns `None` when there are no runs or every run was empty, since
/// there is no proportion to preserve.
pub fn redistribute(new_text: &str, original_lengths: &[usize]) -> Option<Vec<String>> {
    let total: usize = original_lengths.iter().sum();
    if total == 0 {
        return None;
    }

    let new_len = new_text.chars().count();
    let last = original_lengths.len() - 1;
    let mut chars = new_text.chars();
    let mut slices = Vec::with_capacity(original_lengths.len());

    for (i, &len) in original_lengths.iter().enumerate() {
        if i == last {
            slices.push(chars.by_ref().collect());
        } else {
            let share = (new_len as u128 * len as u128 / total as u128) as usize;
            slices.push(chars.by_ref().take(share).collect());
        }
    }
    Some(slices)
}
