//! PDF processing module.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;

/// Minimum number of non-whitespace characters for a PDF to count as text-based.
const MIN_TEXT_CHARS: usize = 30;

/// Type of PDF content, judged from the extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains extractable text.
    Text,
    /// Little or no embedded text, probably a scan.
    Scanned,
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Classify extracted text. Used for diagnostics only: scans still yield their
/// (empty) text rather than an error.
pub fn classify_text(text: &str) -> PdfType {
    let meaningful = text.chars().filter(|c| !c.is_whitespace()).count();
    if meaningful < MIN_TEXT_CHARS {
        PdfType::Scanned
    } else {
        PdfType::Text
    }
}
