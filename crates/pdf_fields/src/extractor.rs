//! Keyword-proximity extraction
//!
//! The value of a field is read from the text right after the first
//! case-insensitive occurrence of its keyword: a window of up to
//! [`MAX_VALUE_CHARS`] characters, whitespace collapsed, cut at the first
//! break character found. Break characters are tried in priority order,
//! so a period anywhere in the window wins over an earlier comma.

use crate::error::{ExtractError, Result};
use crate::fields::{default_fields, ExtractionField};
use regex_lite::{escape, RegexBuilder};
use serde::Serialize;
use std::path::Path;

/// Characters read after a keyword
pub const MAX_VALUE_CHARS: usize = 100;

/// Break characters, highest priority first
pub const BREAK_CHARS: [char; 6] = ['\n', '.', ',', ';', ':', ' '];

/// Reported for a keyword that does not occur in the text
pub const NOT_FOUND: &str = "Non trouvé";
/// Reported for a field without keyword
pub const NOT_DEFINED: &str = "Non défini";

/// Outcome of one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Found(String),
    NotFound,
    NotDefined,
}

impl FieldValue {
    /// Text shown for the field
    pub fn as_str(&self) -> &str {
        match self {
            FieldValue::Found(value) => value,
            FieldValue::NotFound => NOT_FOUND,
            FieldValue::NotDefined => NOT_DEFINED,
        }
    }
}

/// A field with its extracted value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedField {
    pub field: String,
    pub value: FieldValue,
}

/// Extracts configured fields from PDF text
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    fields: Vec<ExtractionField>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(default_fields())
    }
}

impl FieldExtractor {
    pub fn new(fields: Vec<ExtractionField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[ExtractionField] {
        &self.fields
    }

    /// Extract every field from a PDF file
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<Vec<ExtractedField>> {
        let text = extract_text(path)?;
        Ok(self.extract_all(&text))
    }

    /// Extract every field from text, in field order
    pub fn extract_all(&self, text: &str) -> Vec<ExtractedField> {
        self.fields
            .iter()
            .map(|f| {
                let value = if !f.is_defined() {
                    FieldValue::NotDefined
                } else {
                    match find_text_after_keyword(text, &f.keyword) {
                        Some(value) if !value.is_empty() => FieldValue::Found(value),
                        _ => FieldValue::NotFound,
                    }
                };
                ExtractedField {
                    field: f.field.clone(),
                    value,
                }
            })
            .collect()
    }
}

/// Text of a PDF file, pages separated by the extractor's own breaks
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    crate::validate::validate_pdf(path)?;

    let bytes = std::fs::read(path)?;
    let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractError::Parse(e.to_string()))?;
    if text.trim().is_empty() {
        tracing::warn!("No text found in {}", path.display());
    }
    tracing::debug!("Extracted {} characters from {}", text.chars().count(), path.display());
    Ok(text)
}

/// Value following the first case-insensitive occurrence of `keyword`.
///
/// Returns `None` when the keyword does not occur, `Some("")` when it is
/// followed by nothing usable.
pub fn find_text_after_keyword(text: &str, keyword: &str) -> Option<String> {
    let pattern = RegexBuilder::new(&escape(keyword))
        .case_insensitive(true)
        .build()
        .ok()?;
    let found = pattern.find(text)?;

    let window: String = text[found.end()..].chars().take(MAX_VALUE_CHARS).collect();
    let collapsed = window.split_whitespace().collect::<Vec<_>>().join(" ");

    for break_char in BREAK_CHARS {
        if let Some(pos) = collapsed.find(break_char) {
            return Some(collapsed[..pos].trim().to_string());
        }
    }
    Some(collapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_wins_over_earlier_space() {
        let text = "Siret : 123 456 789.\nAutre";
        assert_eq!(find_text_after_keyword(text, "siret : ").as_deref(), Some("123 456 789"));
    }

    #[test]
    fn test_comma_then_space() {
        assert_eq!(
            find_text_after_keyword("Représentée par Alice Martin, gérante", "Représentée par").as_deref(),
            Some("Alice Martin")
        );
        assert_eq!(
            find_text_after_keyword("Lieu : Arles centre", "Lieu : ").as_deref(),
            Some("Arles")
        );
    }

    #[test]
    fn test_newline_collapses_to_space() {
        let text = "Formateur :\n  Jean\nDupont";
        assert_eq!(find_text_after_keyword(text, "formateur :").as_deref(), Some("Jean"));
    }

    #[test]
    fn test_keyword_with_regex_characters() {
        let text = "2) SARL Exemple";
        assert_eq!(find_text_after_keyword(text, "2)").as_deref(), Some("SARL"));
        assert_eq!(find_text_after_keyword("a (b) c", "(b)").as_deref(), Some("c"));
    }

    #[test]
    fn test_window_is_limited() {
        let text = format!("Email {}", "x".repeat(150));
        let value = find_text_after_keyword(&text, "Email").unwrap();
        assert_eq!(value.chars().count(), MAX_VALUE_CHARS - 1);
    }

    #[test]
    fn test_first_occurrence_only() {
        let text = "Tel : 0102. Tel : 0304";
        assert_eq!(find_text_after_keyword(text, "Tel : ").as_deref(), Some("0102"));
    }

    #[test]
    fn test_missing_keyword() {
        assert_eq!(find_text_after_keyword("rien", "Siret"), None);
        assert_eq!(find_text_after_keyword("fin Siret", "Siret").as_deref(), Some(""));
    }

    #[test]
    fn test_extract_all_statuses() {
        let extractor = FieldExtractor::new(vec![
            ExtractionField::new("Siret : ", "Numéro Siret"),
            ExtractionField::new("TVA : ", "Numéro TVA"),
            ExtractionField::new("", "Région"),
        ]);
        let results = extractor.extract_all("Siret : 42.");
        let values: Vec<&str> = results.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["42", NOT_FOUND, NOT_DEFINED]);
        assert_eq!(results[2].field, "Région");
    }
}
