//! Spreadsheet parser for placeholder data sources

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDate;

use crate::csv_parser::unique_headers;
use crate::data_source::{ColumnDef, DataSource, DataSourceType, DataType, Record, Value};
use crate::error::{MailMergeError, Result};

/// Selector for which sheet to read from a workbook
#[derive(Debug, Clone, Default)]
pub enum SheetSelector {
    ByName(String),
    /// 0-based
    ByIndex(usize),
    #[default]
    First,
}

/// Spreadsheet parser configuration
#[derive(Debug, Clone)]
pub struct XlsxConfig {
    pub sheet: SheetSelector,
    /// Whether the first row contains headers
    pub has_header: bool,
    /// Whether to trim whitespace from string values
    pub trim_whitespace: bool,
    /// Drop rows with no value at all. Off by default so record indices
    /// follow spreadsheet rows.
    pub skip_empty_rows: bool,
}

impl Default for XlsxConfig {
    fn default() -> Self {
        Self {
            sheet: SheetSelector::First,
            has_header: true,
            trim_whitespace: true,
            skip_empty_rows: false,
        }
    }
}

impl XlsxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet = SheetSelector::ByName(name.into());
        self
    }

    pub fn with_sheet_index(mut self, index: usize) -> Self {
        self.sheet = SheetSelector::ByIndex(index);
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_skip_empty_rows(mut self, skip: bool) -> Self {
        self.skip_empty_rows = skip;
        self
    }
}

/// Parser for `.xlsx` and legacy `.xls` workbooks
#[derive(Debug, Clone, Default)]
pub struct XlsxParser {
    config: XlsxConfig,
}

impl XlsxParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: XlsxConfig) -> Self {
        Self { config }
    }

    /// Parse a workbook file, format chosen from its extension
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<DataSource> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MailMergeError::FileNotFound(path.display().to_string()));
        }

        let mut workbook = open_workbook_auto(path)
            .map_err(|e| MailMergeError::XlsxParse(format!("Failed to open workbook: {}", e)))?;
        let sheet_name = self.select_sheet(&workbook.sheet_names())?;
        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            MailMergeError::XlsxParse(format!("Failed to read sheet '{}': {}", sheet_name, e))
        })?;

        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("xlsx_source")
            .to_string();
        let source_type = DataSourceType::Xlsx {
            path: path.display().to_string(),
            sheet: sheet_name,
        };
        self.parse_range(&range, id, source_type)
    }

    fn select_sheet(&self, sheet_names: &[String]) -> Result<String> {
        if sheet_names.is_empty() {
            return Err(MailMergeError::EmptyDataSource("Workbook has no sheets".to_string()));
        }

        match &self.config.sheet {
            SheetSelector::ByName(name) => sheet_names
                .iter()
                .find(|s| *s == name)
                .cloned()
                .ok_or_else(|| {
                    MailMergeError::XlsxParse(format!(
                        "Sheet '{}' not found. Available sheets: {:?}",
                        name, sheet_names
                    ))
                }),
            SheetSelector::ByIndex(index) => sheet_names.get(*index).cloned().ok_or_else(|| {
                MailMergeError::XlsxParse(format!(
                    "Sheet index {} out of range. Workbook has {} sheets",
                    index,
                    sheet_names.len()
                ))
            }),
            SheetSelector::First => Ok(sheet_names[0].clone()),
        }
    }

    pub(crate) fn parse_range(&self, range: &Range<Data>, id: String, source_type: DataSourceType) -> Result<DataSource> {
        if range.is_empty() {
            return Err(MailMergeError::EmptyDataSource("Excel sheet is empty".to_string()));
        }

        let mut rows = range.rows();
        let headers = if self.config.has_header {
            let header_row = rows.next().unwrap_or(&[]);
            unique_headers(header_row.iter().map(|cell| self.cell_to_value(cell).to_string_value()))
        } else {
            unique_headers((0..range.width()).map(|_| String::new()))
        };

        let mut raw_rows: Vec<&[Data]> = Vec::new();
        for row in rows {
            if self.config.skip_empty_rows && row.iter().all(|c| matches!(c, Data::Empty)) {
                continue;
            }
            raw_rows.push(row);
        }

        let mut data_source = DataSource::new(id, source_type);
        for (col_idx, header) in headers.iter().enumerate() {
            data_source.add_column(ColumnDef::new(header.clone(), detect_column_type(&raw_rows, col_idx)));
        }

        for row in raw_rows {
            let mut record = Record::new();
            for (header, cell) in headers.iter().zip(row.iter()) {
                record.insert(header.clone(), self.cell_to_value(cell));
            }
            data_source.add_record(record);
        }

        Ok(data_source)
    }

    fn cell_to_value(&self, cell: &Data) -> Value {
        match cell {
            Data::Empty => Value::Null,
            Data::String(s) => {
                let text = if self.config.trim_whitespace { s.trim() } else { s.as_str() };
                if text.is_empty() {
                    Value::Null
                } else {
                    Value::Text(text.to_string())
                }
            }
            Data::Int(n) => Value::Number(*n as f64),
            Data::Float(n) => Value::Number(*n),
            Data::Bool(b) => Value::Boolean(*b),
            Data::DateTime(dt) => {
                let serial = dt.as_f64();
                excel_serial_to_date(serial)
                    .map(Value::Date)
                    .unwrap_or(Value::Number(serial))
            }
            Data::DateTimeIso(s) => s
                .get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .map(Value::Date)
                .unwrap_or_else(|| Value::Text(s.clone())),
            Data::DurationIso(s) => Value::Text(s.clone()),
            // Formula errors carry no usable text
            Data::Error(_) => Value::Null,
        }
    }
}

fn detect_column_type(rows: &[&[Data]], col_idx: usize) -> DataType {
    let mut seen: Option<DataType> = None;
    for row in rows {
        let data_type = match row.get(col_idx) {
            None | Some(Data::Empty) | Some(Data::Error(_)) => continue,
            Some(Data::Int(_)) | Some(Data::Float(_)) => DataType::Number,
            Some(Data::Bool(_)) => DataType::Boolean,
            Some(Data::DateTime(_)) | Some(Data::DateTimeIso(_)) => DataType::Date,
            Some(Data::String(_)) | Some(Data::DurationIso(_)) => DataType::Text,
        };
        match seen {
            None => seen = Some(data_type),
            Some(t) if t != data_type => return DataType::Text,
            Some(_) => {}
        }
    }
    seen.unwrap_or(DataType::Text)
}

/// Convert an Excel serial day number (1900 date system) to a date.
///
/// Counting from 1899-12-30 is exact from 1900-03-01 on; earlier serials
/// sit before Excel's phantom 1900-02-29 and are shifted by one day.
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let mut days = serial.floor() as i64;
    if days < 60 {
        days += 1;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(chrono::Duration::days(days))
}

/// List sheet names of a workbook file
pub fn get_sheet_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MailMergeError::FileNotFound(path.display().to_string()));
    }
    let workbook = open_workbook_auto(path)
        .map_err(|e| MailMergeError::XlsxParse(format!("Failed to open workbook: {}", e)))?;
    Ok(workbook.sheet_names())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    fn sheet(rows: &[&[Data]]) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn test_parse_range_with_placeholder_row() {
        let range = sheet(&[
            &[text("Nom de l'organisme"), text("Effectif")],
            &[text(" [nom_organisme] "), text("[effectif]")],
            &[text("Mairie d'Arles"), Data::Int(120)],
        ]);
        let ds = XlsxParser::new()
            .parse_range(&range, "test".into(), DataSourceType::Inline)
            .unwrap();

        assert_eq!(ds.column_names(), vec!["Nom de l'organisme", "Effectif"]);
        assert_eq!(ds.record_count(), 2);
        assert_eq!(
            ds.get_value(0, "Nom de l'organisme").unwrap().to_string_value(),
            "[nom_organisme]"
        );
        assert_eq!(ds.get_value(1, "Effectif").unwrap().to_string_value(), "120");
    }

    #[test]
    fn test_empty_rows_kept_by_default() {
        let range = sheet(&[&[text("a")], &[Data::Empty], &[text("x")]]);
        let ds = XlsxParser::new()
            .parse_range(&range, "t".into(), DataSourceType::Inline)
            .unwrap();
        assert_eq!(ds.record_count(), 2);

        let ds = XlsxParser::with_config(XlsxConfig::new().with_skip_empty_rows(true))
            .parse_range(&range, "t".into(), DataSourceType::Inline)
            .unwrap();
        assert_eq!(ds.record_count(), 1);
    }

    #[test]
    fn test_no_header_generates_names() {
        let range = sheet(&[&[text("a"), text("b")]]);
        let ds = XlsxParser::with_config(XlsxConfig::new().with_header(false))
            .parse_range(&range, "t".into(), DataSourceType::Inline)
            .unwrap();
        assert_eq!(ds.column_names(), vec!["Column1", "Column2"]);
        assert_eq!(ds.record_count(), 1);
    }

    #[test]
    fn test_cell_to_value() {
        let parser = XlsxParser::new();
        assert_eq!(parser.cell_to_value(&Data::Empty), Value::Null);
        assert_eq!(parser.cell_to_value(&text("  ")), Value::Null);
        assert_eq!(parser.cell_to_value(&Data::Float(3.0)).to_string_value(), "3");
        assert_eq!(parser.cell_to_value(&Data::Bool(false)), Value::Boolean(false));

        let dt = ExcelDateTime::new(45292.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            parser.cell_to_value(&Data::DateTime(dt)),
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
        assert!(matches!(
            parser.cell_to_value(&Data::DateTimeIso("2024-01-15T10:00:00".into())),
            Value::Date(_)
        ));
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(excel_serial_to_date(1.0), NaiveDate::from_ymd_opt(1900, 1, 1));
        assert_eq!(excel_serial_to_date(59.0), NaiveDate::from_ymd_opt(1900, 2, 28));
        assert_eq!(excel_serial_to_date(61.0), NaiveDate::from_ymd_opt(1900, 3, 1));
        assert_eq!(excel_serial_to_date(0.0), None);
    }

    #[test]
    fn test_detect_column_type() {
        let int: &[Data] = &[Data::Int(1)];
        let float: &[Data] = &[Data::Float(2.5)];
        let s: &[Data] = &[text("x")];
        assert_eq!(detect_column_type(&[int, float], 0), DataType::Number);
        assert_eq!(detect_column_type(&[int, s], 0), DataType::Text);
        assert_eq!(detect_column_type(&[], 0), DataType::Text);
    }

    #[test]
    fn test_select_sheet() {
        let names = vec!["Feuil1".to_string(), "Données".to_string()];
        let parser = XlsxParser::with_config(XlsxConfig::new().with_sheet_name("Données"));
        assert_eq!(parser.select_sheet(&names).unwrap(), "Données");
        let parser = XlsxParser::with_config(XlsxConfig::new().with_sheet_index(5));
        assert!(parser.select_sheet(&names).is_err());
    }

    #[test]
    fn test_parser_file_not_found() {
        let result = XlsxParser::new().parse_file("/nonexistent/data.xlsx");
        assert!(matches!(result, Err(MailMergeError::FileNotFound(_))));
    }
}
