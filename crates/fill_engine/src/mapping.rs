//! Token mapping - literal placeholder to replacement value

use crate::error::{FillError, Result};
use serde::{Deserialize, Serialize};

/// Literal token → replacement string, iterated in insertion order.
///
/// Keys are unique. Re-inserting a key keeps its original position and
/// swaps the value. Order only matters for [`crate::CellMode::Sequential`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMapping")]
pub struct TokenMapping {
    entries: Vec<(String, String)>,
}

/// Serialized form, checked through [`TokenMapping::from_pairs`]
#[derive(Deserialize)]
struct RawMapping {
    entries: Vec<(String, String)>,
}

impl TryFrom<RawMapping> for TokenMapping {
    type Error = FillError;

    fn try_from(raw: RawMapping) -> Result<Self> {
        Self::from_pairs(raw.entries)
    }
}

impl TokenMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from pairs. Later duplicates overwrite earlier values.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut mapping = Self::new();
        for (token, value) in pairs {
            mapping.insert(token, value)?;
        }
        Ok(mapping)
    }

    /// Insert a token, returning the previous value if the token existed
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) -> Result<Option<String>> {
        let token = token.into();
        if token.is_empty() {
            return Err(FillError::EmptyToken);
        }
        let value = value.into();
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some((_, existing)) => Ok(Some(std::mem::replace(existing, value))),
            None => {
                self.entries.push((token, value));
                Ok(None)
            }
        }
    }

    /// Append every entry of `other`, overwriting shared tokens
    pub fn extend(&mut self, other: &TokenMapping) {
        for (token, value) in other.iter() {
            // Tokens in `other` are already non-empty.
            let _ = self.insert(token, value);
        }
    }

    /// Look up the replacement for a token
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, v)| v.as_str())
    }

    /// Token and value at a position in insertion order
    pub fn entry(&self, index: usize) -> Option<(&str, &str)> {
        self.entries.get(index).map(|(t, v)| (t.as_str(), v.as_str()))
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there is nothing to substitute
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (token, value) in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    /// Tokens in insertion order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    /// True if any token occurs in `text`
    pub fn any_token_in(&self, text: &str) -> bool {
        self.entries.iter().any(|(t, _)| text.contains(t.as_str()))
    }
}
