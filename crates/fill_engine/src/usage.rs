//! Token usage accounting across text units

use crate::mapping::TokenMapping;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How often each token was substituted and how many units changed.
///
/// Callers use this to report placeholders that never matched anywhere in
/// a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    hits: HashMap<String, usize>,
    units_changed: usize,
}

impl TokenUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` substitutions of `token`
    pub fn record_hits(&mut self, token: &str, count: usize) {
        if count == 0 {
            return;
        }
        *self.hits.entry(token.to_string()).or_insert(0) += count;
    }

    /// Record that one paragraph or cell was rewritten
    pub fn record_unit_changed(&mut self) {
        self.units_changed += 1;
    }

    /// Substitutions made for `token`
    pub fn hits(&self, token: &str) -> usize {
        self.hits.get(token).copied().unwrap_or(0)
    }

    /// Total substitutions over every token
    pub fn total_hits(&self) -> usize {
        self.hits.values().sum()
    }

    /// Paragraphs or cells rewritten
    pub fn units_changed(&self) -> usize {
        self.units_changed
    }

    /// Tokens of `mapping` that never matched, in mapping order
    pub fn unmatched<'a>(&self, mapping: &'a TokenMapping) -> Vec<&'a str> {
        mapping.tokens().filter(|t| self.hits(t) == 0).collect()
    }

    /// Fold another usage record into this one
    pub fn merge(&mut self, other: &TokenUsage) {
        for (token, count) in &other.hits {
            self.record_hits(token, *count);
        }
        self.units_changed += other.units_changed;
    }
}
