//! Literal token matching over a flat string
//!
//! Every token is searched independently, left to right without overlap
//! against itself. Candidates from different tokens may then collide
//! (`[nom]` inside `[nom_complet]`); [`resolve_overlaps`] keeps the
//! earliest start, preferring the longer token on ties and then mapping
//! order, and discards anything that overlaps a kept span.
//!
//! Spans are byte offsets into the searched text. Byte order agrees with
//! character order, so sorting and overlap checks are the same either way.

use crate::mapping::TokenMapping;

/// A token occurrence in the searched text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Position of the token in the mapping
    pub token_index: usize,
}

impl MatchSpan {
    /// Length of the matched token in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false for tokens accepted by [`TokenMapping`]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    fn overlaps(&self, other: &MatchSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Collect every occurrence of every token, unresolved
pub fn find_matches(text: &str, mapping: &TokenMapping) -> Vec<MatchSpan> {
    let mut matches = Vec::new();
    for (token_index, token) in mapping.tokens().enumerate() {
        for (start, found) in text.match_indices(token) {
            matches.push(MatchSpan {
                start,
                end: start + found.len(),
                token_index,
            });
        }
    }
    matches
}

/// Reduce candidates to a non-overlapping set sorted by start
pub fn resolve_overlaps(mut matches: Vec<MatchSpan>) -> Vec<MatchSpan> {
    matches.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.len().cmp(&a.len()))
            .then_with(|| a.token_index.cmp(&b.token_index))
    });

    let mut kept: Vec<MatchSpan> = Vec::with_capacity(matches.len());
    for candidate in matches {
        match kept.last() {
            Some(last) if last.overlaps(&candidate) => continue,
            _ => kept.push(candidate),
        }
    }
    kept
}

/// Splice replacement values into `text` at the given resolved spans
pub fn apply_matches(text: &str, matches: &[MatchSpan], mapping: &TokenMapping) -> String {
    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in matches {
        let Some((_, value)) = mapping.entry(span.token_index) else {
            continue;
        };
        result.push_str(&text[cursor..span.start]);
        result.push_str(value);
        cursor = span.end;
    }
    result.push_str(&text[cursor..]);
    result
}
