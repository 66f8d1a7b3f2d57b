//! PDF Fields - scrape labeled values out of PDF text
//!
//! A PDF is validated (extension, `%PDF` header, 50 MiB limit), its text
//! extracted, and each configured field read from the text that follows
//! its keyword. Results can be exported as a two-column CSV.
//!
//! ```rust
//! use pdf_fields::{ExtractionField, FieldExtractor};
//!
//! let extractor = FieldExtractor::new(vec![ExtractionField::new("Siret : ", "Numéro Siret")]);
//! let fields = extractor.extract_all("Siret : 123 456 789 00012. TVA : FR00");
//! assert_eq!(fields[0].value.as_str(), "123 456 789 00012");
//! ```

mod error;
mod export;
mod extractor;
mod fields;
mod validate;

pub use error::{ExtractError, Result};
pub use export::{save_csv, to_csv_string, write_csv, CSV_HEADER};
pub use extractor::{
    extract_text, find_text_after_keyword, ExtractedField, FieldExtractor, FieldValue, BREAK_CHARS,
    MAX_VALUE_CHARS, NOT_DEFINED, NOT_FOUND,
};
pub use fields::{default_fields, load_fields, ExtractionField};
pub use validate::{has_pdf_header, validate_pdf, MAX_PDF_SIZE};
