//! Placeholder row mapping
//!
//! One row of the data source (the placeholder row, usually the first
//! data row under the headers) holds the token each column feeds, e.g.
//! `[nom_organisme]` under `Nom de l'organisme`. Every other row is a
//! record that can be resolved into a [`TokenMapping`].

use crate::data_source::DataSource;
use crate::error::{MailMergeError, Result};
use fill_engine::TokenMapping;
use serde::Serialize;

/// A column and the token it fills
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderColumn {
    pub token: String,
    pub column: String,
}

/// Tokens declared by the placeholder row, in column order
#[derive(Debug, Clone, Serialize)]
pub struct PlaceholderMap {
    placeholder_row: usize,
    entries: Vec<PlaceholderColumn>,
}

impl PlaceholderMap {
    /// Read the placeholder row of `source`.
    ///
    /// Keys are trimmed; columns whose placeholder cell is empty are skipped.
    pub fn from_data_source(source: &DataSource, placeholder_row: usize) -> Result<Self> {
        let row = source
            .get_record(placeholder_row)
            .ok_or(MailMergeError::RecordNotFound {
                index: placeholder_row,
                count: source.record_count(),
            })?;

        let mut entries: Vec<PlaceholderColumn> = Vec::new();
        for column in &source.columns {
            let Some(value) = row.get(&column.name) else {
                continue;
            };
            let token = value.to_string_value().trim().to_string();
            if token.is_empty() {
                continue;
            }
            if let Some(existing) = entries.iter_mut().find(|e| e.token == token) {
                tracing::warn!(
                    "Token {} declared by columns '{}' and '{}', using the latter",
                    token,
                    existing.column,
                    column.name
                );
                existing.column = column.name.clone();
                continue;
            }
            entries.push(PlaceholderColumn {
                token,
                column: column.name.clone(),
            });
        }

        Ok(Self {
            placeholder_row,
            entries,
        })
    }

    pub fn placeholder_row(&self) -> usize {
        self.placeholder_row
    }

    pub fn entries(&self) -> &[PlaceholderColumn] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column feeding `token`
    pub fn column_for(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.token == token)
            .map(|e| e.column.as_str())
    }

    /// Build the token mapping for one record. Missing values map to the
    /// empty string.
    pub fn resolve(&self, source: &DataSource, record_index: usize) -> Result<TokenMapping> {
        if record_index == self.placeholder_row {
            return Err(MailMergeError::PlaceholderRowSelected(record_index));
        }
        let record = source
            .get_record(record_index)
            .ok_or(MailMergeError::RecordNotFound {
                index: record_index,
                count: source.record_count(),
            })?;

        let mut mapping = TokenMapping::new();
        for entry in &self.entries {
            let value = record
                .get(&entry.column)
                .map(|v| v.to_string_value())
                .unwrap_or_default();
            mapping.insert(entry.token.clone(), value)?;
        }
        Ok(mapping)
    }
}

/// String value of `column` in a record, used to label outputs
pub fn record_value(source: &DataSource, record_index: usize, column: &str) -> Result<String> {
    if !source.has_column(column) {
        return Err(MailMergeError::ColumnNotFound(column.to_string()));
    }
    let record = source
        .get_record(record_index)
        .ok_or(MailMergeError::RecordNotFound {
            index: record_index,
            count: source.record_count(),
        })?;
    Ok(record
        .get(column)
        .map(|v| v.to_string_value())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_parser::CsvParser;

    fn source() -> DataSource {
        let csv = "Nom de l'organisme,Ville,Notes,Effectif\n\
                   \" [nom_organisme] \",[ville],,[effectif]\n\
                   Mairie d'Arles,Arles,libre,120\n\
                   Association Camargue,,x,";
        CsvParser::new().parse_string(csv, "test").unwrap()
    }

    #[test]
    fn test_placeholder_row_trims_and_skips_empty() {
        let map = PlaceholderMap::from_data_source(&source(), 0).unwrap();
        let tokens: Vec<&str> = map.entries().iter().map(|e| e.token.as_str()).collect();
        assert_eq!(tokens, vec!["[nom_organisme]", "[ville]", "[effectif]"]);
        assert_eq!(map.column_for("[ville]"), Some("Ville"));
        assert_eq!(map.column_for("Notes"), None);
    }

    #[test]
    fn test_resolve_record() {
        let ds = source();
        let map = PlaceholderMap::from_data_source(&ds, 0).unwrap();
        let mapping = map.resolve(&ds, 1).unwrap();
        assert_eq!(mapping.get("[nom_organisme]"), Some("Mairie d'Arles"));
        assert_eq!(mapping.get("[effectif]"), Some("120"));
    }

    #[test]
    fn test_missing_values_resolve_empty() {
        let ds = source();
        let map = PlaceholderMap::from_data_source(&ds, 0).unwrap();
        let mapping = map.resolve(&ds, 2).unwrap();
        assert_eq!(mapping.get("[ville]"), Some(""));
        assert_eq!(mapping.get("[effectif]"), Some(""));
    }

    #[test]
    fn test_resolve_out_of_range() {
        let ds = source();
        let map = PlaceholderMap::from_data_source(&ds, 0).unwrap();
        assert!(matches!(
            map.resolve(&ds, 9),
            Err(MailMergeError::RecordNotFound { index: 9, count: 3 })
        ));
        assert!(matches!(
            map.resolve(&ds, 0),
            Err(MailMergeError::PlaceholderRowSelected(0))
        ));
    }

    #[test]
    fn test_placeholder_row_out_of_range() {
        assert!(PlaceholderMap::from_data_source(&source(), 10).is_err());
    }

    #[test]
    fn test_record_value() {
        let ds = source();
        assert_eq!(record_value(&ds, 1, "Nom de l'organisme").unwrap(), "Mairie d'Arles");
        assert!(matches!(
            record_value(&ds, 1, "Inconnu"),
            Err(MailMergeError::ColumnNotFound(_))
        ));
    }
}
