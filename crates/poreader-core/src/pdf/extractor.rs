//! PDF text extraction using lopdf and pdf-extract.

use std::borrow::Cow;

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfType, Result, classify_text};
use crate::error::{ExtractionError, PdfError};
use crate::extract::TextExtractor;

/// PDF text extractor.
///
/// Documents protected only by an empty user password are decrypted before
/// extraction; any other encryption is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self
    }

    /// Parse the document and return bytes `pdf-extract` can read, plus the page count.
    fn prepare<'a>(&self, data: &'a [u8]) -> Result<(Cow<'a, [u8]>, usize)> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;
        let page_count = doc.get_pages().len();

        if !doc.is_encrypted() {
            return Ok((Cow::Borrowed(data), page_count));
        }

        if doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");

        let mut decrypted = Vec::new();
        doc.save_to(&mut decrypted)
            .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
        Ok((Cow::Owned(decrypted), page_count))
    }

    /// Extract the text of every page, joined in page order.
    pub fn extract_text(&self, data: &[u8]) -> Result<String> {
        let (raw, page_count) = self.prepare(data)?;

        if page_count == 0 {
            debug!("PDF has no pages");
            return Ok(String::new());
        }

        let text = pdf_extract::extract_text_from_mem(&raw)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        let pdf_type = classify_text(&text);
        debug!(
            "PDF analysis: {} pages, {} chars text -> {:?}",
            page_count,
            text.len(),
            pdf_type
        );
        if pdf_type == PdfType::Scanned {
            warn!("PDF has almost no embedded text; scanned pages are not OCRed");
        }

        Ok(text)
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, data: &[u8]) -> std::result::Result<String, ExtractionError> {
        Ok(self.extract_text(data)?)
    }
}
