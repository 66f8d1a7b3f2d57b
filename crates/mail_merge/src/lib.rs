//! Tabular Data Sources
//!
//! Loads the data that feeds document filling and turns one row of it
//! into a [`fill_engine::TokenMapping`].
//!
//! # Features
//!
//! - CSV/TSV parsing with delimiter detection and text-preserving values
//! - XLSX/XLS parsing with sheet selection
//! - Placeholder-row mapping: one row names the token for each column
//!
//! # Example
//!
//! ```rust
//! use mail_merge::{CsvParser, PlaceholderMap};
//!
//! let csv_data = "Nom,Ville\n[nom],[ville]\nAlice,Arles";
//! let data_source = CsvParser::new().parse_string(csv_data, "contacts").unwrap();
//!
//! let placeholders = PlaceholderMap::from_data_source(&data_source, 0).unwrap();
//! let mapping = placeholders.resolve(&data_source, 1).unwrap();
//! assert_eq!(mapping.get("[ville]"), Some("Arles"));
//! ```

mod csv_parser;
mod data_source;
mod error;
mod placeholder_map;
mod xlsx_parser;

pub use csv_parser::{detect_delimiter, CsvConfig, CsvParser};
pub use data_source::{ColumnDef, DataSource, DataSourceType, DataType, Record, Value};
pub use error::{MailMergeError, Result};
pub use placeholder_map::{record_value, PlaceholderColumn, PlaceholderMap};
pub use xlsx_parser::{get_sheet_names, SheetSelector, XlsxConfig, XlsxParser};

use std::path::Path;

/// Load a data source from a file, choosing the parser from its extension.
///
/// CSV delimiters are detected from the first line.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<DataSource> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => {
            if !path.exists() {
                return Err(MailMergeError::FileNotFound(path.display().to_string()));
            }
            let content = std::fs::read_to_string(path)?;
            let delimiter = detect_delimiter(content.trim_start_matches('\u{feff}'));
            CsvParser::with_config(CsvConfig::default().with_delimiter(delimiter)).parse_file(path)
        }
        "tsv" => CsvParser::with_config(CsvConfig::tab()).parse_file(path),
        "xlsx" | "xlsm" | "xls" => XlsxParser::new().parse_file(path),
        _ => Err(MailMergeError::UnsupportedFormat(format!(
            "Unknown file extension for: {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_csv_file() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "Nom;Ville").unwrap();
        writeln!(file, "[nom];[ville]").unwrap();
        writeln!(file, "Alice;Arles").unwrap();

        let ds = load_from_file(file.path()).unwrap();
        assert_eq!(ds.record_count(), 2);
        assert!(ds.has_column("Ville"));
        assert!(matches!(ds.source_type, DataSourceType::Csv { delimiter: ';', .. }));
    }

    #[test]
    fn test_load_tsv_file() {
        let mut file = NamedTempFile::with_suffix(".tsv").unwrap();
        writeln!(file, "name\tage").unwrap();
        writeln!(file, "Alice\t30").unwrap();

        let ds = load_from_file(file.path()).unwrap();
        assert_eq!(ds.record_count(), 1);
        assert!(ds.has_column("age"));
    }

    #[test]
    fn test_unsupported_format() {
        let result = load_from_file("/path/to/file.xyz");
        assert!(matches!(result, Err(MailMergeError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_from_file("/path/to/missing.csv");
        assert!(matches!(result, Err(MailMergeError::FileNotFound(_))));
    }
}
