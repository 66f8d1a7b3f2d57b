//! CSV export of extracted fields

use crate::error::Result;
use crate::extractor::ExtractedField;
use std::io::Write;
use std::path::Path;

/// CSV header row
pub const CSV_HEADER: [&str; 2] = ["Champ", "Valeur"];

/// Write fields as CSV with every value quoted
pub fn write_csv<W: Write>(fields: &[ExtractedField], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;
    for field in fields {
        csv_writer.write_record([field.field.as_str(), field.value.as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Fields as a CSV string
pub fn to_csv_string(fields: &[ExtractedField]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(fields, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write fields to a CSV file
pub fn save_csv(fields: &[ExtractedField], path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(fields, file)
}
