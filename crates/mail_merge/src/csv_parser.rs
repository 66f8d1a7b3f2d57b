//! CSV parser for placeholder data sources

use std::collections::HashSet;
use std::path::Path;

use crate::data_source::{ColumnDef, DataSource, DataSourceType, DataType, Record, Value};
use crate::error::{MailMergeError, Result};

/// CSV parser configuration
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Delimiter character
    pub delimiter: char,
    /// Whether the first row contains headers
    pub has_header: bool,
    /// Whether to trim whitespace from values
    pub trim_whitespace: bool,
    /// Whether to detect numbers, booleans and dates. Off by default so
    /// values reach documents exactly as typed.
    pub auto_detect_types: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
            trim_whitespace: true,
            auto_detect_types: false,
        }
    }
}

impl CsvConfig {
    /// Semicolon-separated, as exported by French-locale spreadsheets
    pub fn semicolon() -> Self {
        Self {
            delimiter: ';',
            ..Default::default()
        }
    }

    pub fn tab() -> Self {
        Self {
            delimiter: '\t',
            ..Default::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_auto_detect(mut self, auto_detect: bool) -> Self {
        self.auto_detect_types = auto_detect;
        self
    }
}

/// CSV parser for creating data sources from CSV files or strings
#[derive(Debug, Clone, Default)]
pub struct CsvParser {
    config: CsvConfig,
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CsvConfig) -> Self {
        Self { config }
    }

    /// Parse a CSV file and return a DataSource
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<DataSource> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MailMergeError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("csv_source")
            .to_string();
        let source_type = DataSourceType::Csv {
            path: path.display().to_string(),
            delimiter: self.config.delimiter,
            has_header: self.config.has_header,
        };
        self.parse_content(&content, id, source_type)
    }

    /// Parse CSV from a string and return a DataSource
    pub fn parse_string(&self, data: &str, id: impl Into<String>) -> Result<DataSource> {
        self.parse_content(data, id.into(), DataSourceType::Inline)
    }

    fn parse_content(&self, content: &str, id: String, source_type: DataSourceType) -> Result<DataSource> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let delimiter = u8::try_from(self.config.delimiter)
            .map_err(|_| MailMergeError::InvalidDelimiter(self.config.delimiter.to_string()))?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .trim(if self.config.trim_whitespace {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = if self.config.has_header {
            csv_reader.headers()?.iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };

        let mut raw_records: Vec<csv::StringRecord> = Vec::new();
        for result in csv_reader.records() {
            raw_records.push(result?);
        }

        if raw_records.is_empty() && headers.is_empty() {
            return Err(MailMergeError::EmptyDataSource("CSV file is empty".to_string()));
        }

        let column_count = raw_records
            .iter()
            .map(|r| r.len())
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);
        let headers = unique_headers(
            (0..column_count).map(|i| headers.get(i).cloned().unwrap_or_default()),
        );

        let mut data_source = DataSource::new(id, source_type);
        for header in &headers {
            data_source.add_column(ColumnDef::new(header.clone(), DataType::Text));
        }

        for raw_record in raw_records {
            let mut record = Record::new();
            for (header, field) in headers.iter().zip(raw_record.iter()) {
                let value = if self.config.auto_detect_types {
                    Value::parse_auto(field)
                } else if field.is_empty() {
                    Value::Null
                } else {
                    Value::Text(field.to_string())
                };
                record.insert(header.clone(), value);
            }
            data_source.add_record(record);
        }

        Ok(data_source)
    }
}

/// Name blank headers `ColumnN` and suffix repeated ones with `.1`, `.2`, ...
pub(crate) fn unique_headers(raw: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(i, header)| {
            let base = if header.trim().is_empty() {
                format!("Column{}", i + 1)
            } else {
                header
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            if name != base {
                tracing::warn!("Duplicate column '{}' renamed to '{}'", base, name);
            }
            name
        })
        .collect()
}

/// Detect the delimiter used in a CSV file from its first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_delimiter = ',';
    let mut best_count = 0;
    for delim in [',', ';', '\t', '|'] {
        let count = first_line.matches(delim).count();
        if count > best_count {
            best_count = count;
            best_delimiter = delim;
        }
    }
    best_delimiter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let csv_data = "Nom,Ville\n[nom],[ville]\nAlice,Arles\nBob,Nîmes";
        let ds = CsvParser::new().parse_string(csv_data, "test").unwrap();

        assert_eq!(ds.column_names(), vec!["Nom", "Ville"]);
        assert_eq!(ds.record_count(), 3);
        assert_eq!(ds.get_value(2, "Ville").unwrap().to_string_value(), "Nîmes");
    }

    #[test]
    fn test_parse_semicolon_delimiter() {
        let csv_data = "Nom;Code postal\nAlice;01234";
        let ds = CsvParser::with_config(CsvConfig::semicolon())
            .parse_string(csv_data, "test")
            .unwrap();

        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.get_value(0, "Code postal").unwrap().to_string_value(), "01234");
    }

    #[test]
    fn test_parse_with_quotes() {
        let csv_data = "name,address\n\"Alice Smith\",\"12 rue de la Paix, Arles\"";
        let ds = CsvParser::new().parse_string(csv_data, "test").unwrap();
        assert_eq!(
            ds.get_value(0, "address").unwrap().to_string_value(),
            "12 rue de la Paix, Arles"
        );
    }

    #[test]
    fn test_bom_is_stripped() {
        let csv_data = "\u{feff}Nom,Ville\nAlice,Arles";
        let ds = CsvParser::new().parse_string(csv_data, "test").unwrap();
        assert!(ds.has_column("Nom"));
    }

    #[test]
    fn test_blank_and_duplicate_headers() {
        let csv_data = "name,,name\na,b,c";
        let ds = CsvParser::new().parse_string(csv_data, "test").unwrap();
        assert_eq!(ds.column_names(), vec!["name", "Column2", "name.1"]);
        assert_eq!(ds.get_value(0, "name.1").unwrap().to_string_value(), "c");
    }

    #[test]
    fn test_ragged_rows_extend_columns() {
        let csv_data = "a,b\n1,2,3";
        let ds = CsvParser::new().parse_string(csv_data, "test").unwrap();
        assert_eq!(ds.column_names(), vec!["a", "b", "Column3"]);
    }

    #[test]
    fn test_empty_fields_are_null() {
        let csv_data = "name,value\nAlice,";
        let ds = CsvParser::new().parse_string(csv_data, "test").unwrap();
        assert!(ds.get_value(0, "value").unwrap().is_null());
    }

    #[test]
    fn test_auto_detect_opt_in() {
        let csv_data = "n\n42";
        let text = CsvParser::new().parse_string(csv_data, "t").unwrap();
        assert_eq!(text.get_value(0, "n"), Some(&Value::Text("42".into())));

        let typed = CsvParser::with_config(CsvConfig::default().with_auto_detect(true))
            .parse_string(csv_data, "t")
            .unwrap();
        assert_eq!(typed.get_value(0, "n"), Some(&Value::Number(42.0)));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c,d"), ',');
        assert_eq!(detect_delimiter("a;b;c;d"), ';');
        assert_eq!(detect_delimiter("a\tb\tc\td"), '\t');
        assert_eq!(detect_delimiter("a|b|c|d"), '|');
    }

    #[test]
    fn test_empty_csv() {
        let result = CsvParser::with_config(CsvConfig::default().with_header(false)).parse_string("", "test");
        assert!(matches!(result, Err(MailMergeError::EmptyDataSource(_))));
    }

    #[test]
    fn test_whitespace_trimming() {
        let ds = CsvParser::new().parse_string("name\n  Alice  ", "test").unwrap();
        assert_eq!(ds.get_value(0, "name").unwrap().to_string_value(), "Alice");
    }
}
