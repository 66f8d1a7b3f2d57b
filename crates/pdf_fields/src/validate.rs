//! Checks run before a PDF is handed to the text extractor

use crate::error::{ExtractError, Result};
use std::io::Read;
use std::path::Path;

/// Largest accepted PDF (50 MiB)
pub const MAX_PDF_SIZE: u64 = 50 * 1024 * 1024;

/// The header may be preceded by junk bytes within this window
const HEADER_WINDOW: usize = 1024;

/// Check the extension, size and header of a PDF file
pub fn validate_pdf(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let is_pdf_name = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !is_pdf_name {
        return Err(ExtractError::NotPdfExtension(display));
    }

    let size = std::fs::metadata(path)?.len();
    if size > MAX_PDF_SIZE {
        return Err(ExtractError::TooLarge {
            size,
            limit: MAX_PDF_SIZE,
        });
    }

    let mut head = Vec::with_capacity(HEADER_WINDOW);
    std::fs::File::open(path)?
        .take(HEADER_WINDOW as u64)
        .read_to_end(&mut head)?;
    if !has_pdf_header(&head) {
        return Err(ExtractError::NotPdfContent(display));
    }
    Ok(())
}

/// Whether `bytes` contain `%PDF` within the header window
pub fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_WINDOW)];
    window.windows(4).any(|w| w == b"%PDF")
}
